mod output;

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use aisle_api::{API_BASE_ENV, CatalogClient, CatalogConfig, CategorySource, FileCategorySource, SessionCachedSource};
use aisle_catalog::{CategoryTree, SelectorAction, SelectorState, flatten_all};
use aisle_types::{CategoryId, category_url};
use aisle_util::{DRAFTS_PATH_ENV, DraftStore, InMemoryDraftStore, JsonDraftStore, app_config_dir};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const LOG_PATH_ENV: &str = "AISLE_LOG_PATH";
const LOG_FILE_NAME: &str = "aisle.log";

/// Browse and pick storefront categories.
#[derive(Debug, Parser)]
#[command(name = "aisle", version, about)]
struct Cli {
    /// Read the category tree from a local JSON/YAML snapshot instead of the API.
    #[arg(long, global = true, value_name = "FILE")]
    tree: Option<PathBuf>,

    /// Catalog API base URL.
    #[arg(long, global = true, env = API_BASE_ENV, value_name = "URL")]
    api_base: Option<String>,

    /// Where selection drafts are persisted.
    #[arg(long, global = true, env = DRAFTS_PATH_ENV, value_name = "FILE")]
    drafts: Option<PathBuf>,

    /// Keep drafts in memory only; takes precedence over `--drafts`.
    #[arg(long, global = true)]
    no_drafts: bool,

    /// Log file used by the interactive selector.
    #[arg(long, global = true, env = LOG_PATH_ENV, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
enum Command {
    /// Interactive category selector (default).
    Browse,
    /// Print the categories matching TERM.
    Search { term: String },
    /// Resolve a category by id, print its breadcrumb and remember it as the current selection.
    Select { id: u64 },
    /// Print the whole category tree with ids.
    Tree,
    /// Print the public browsing URL of a category.
    Url { id: u64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Command::Browse);
    let interactive = command == Command::Browse;
    init_tracing(interactive, cli.log_file.as_deref());

    let source = build_source(&cli)?;
    match command {
        Command::Browse => {
            let drafts = build_draft_store(&cli);
            aisle_tui::run(source, drafts).await
        }
        Command::Search { term } => {
            let tree = load_tree(source.as_ref()).await?;
            let mut state = SelectorState::new(tree);
            state.apply(SelectorAction::Search(term.clone()));
            let rows = state.rows();
            if rows.is_empty() {
                println!("No categories match \"{term}\"");
            } else {
                print!("{}", output::render_rows(&rows, false));
            }
            Ok(())
        }
        Command::Select { id } => {
            let tree = load_tree(source.as_ref()).await?;
            let node = tree.find(CategoryId(id)).cloned().with_context(|| format!("category {id} not found"))?;
            let mut state = SelectorState::new(tree);
            let drafts = build_draft_store(&cli);
            if let Some(path) = state.apply(SelectorAction::SelectNode(node)) {
                print!("{}", output::render_selection(&path));
                drafts
                    .set(aisle_tui::SELECTION_DRAFT_KEY, serde_json::to_value(CategoryId(id))?)
                    .context("failed to persist selection draft")?;
            }
            Ok(())
        }
        Command::Tree => {
            let tree = load_tree(source.as_ref()).await?;
            print!("{}", output::render_rows(&flatten_all(tree.roots()), true));
            Ok(())
        }
        Command::Url { id } => {
            let tree = load_tree(source.as_ref()).await?;
            let Some(node) = tree.find(CategoryId(id)) else {
                bail!("category {id} not found");
            };
            println!("{}", category_url(node));
            Ok(())
        }
    }
}

/// Interactive mode logs to a file so the alternate screen stays clean;
/// everything else logs to stderr.
fn init_tracing(interactive: bool, log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !interactive {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        return;
    }

    let path = log_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| app_config_dir().join(LOG_FILE_NAME));
    match open_log_file(&path) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(error) => eprintln!("logging disabled: cannot open {}: {error:#}", path.display()),
    }
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(file)
}

fn build_source(cli: &Cli) -> Result<Arc<dyn CategorySource>> {
    if let Some(path) = cli.tree.as_ref() {
        return Ok(Arc::new(SessionCachedSource::new(FileCategorySource::new(path))));
    }
    let config = CatalogConfig::from_env(cli.api_base.clone());
    let client = CatalogClient::new(config).context("invalid catalog API configuration")?;
    Ok(Arc::new(SessionCachedSource::new(client)))
}

fn build_draft_store(cli: &Cli) -> Arc<dyn DraftStore> {
    if cli.no_drafts {
        return Arc::new(InMemoryDraftStore::new());
    }
    match JsonDraftStore::new(cli.drafts.clone()) {
        Ok(store) => {
            info!(path = %store.path().display(), "using draft store");
            Arc::new(store)
        }
        Err(error) => {
            warn!(%error, "draft store unavailable; selections will not survive this session");
            Arc::new(InMemoryDraftStore::new())
        }
    }
}

async fn load_tree(source: &dyn CategorySource) -> Result<CategoryTree> {
    source
        .load()
        .await
        .with_context(|| format!("failed to load categories from {}", source.describe()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_browse() {
        temp_env::with_vars_unset([API_BASE_ENV, DRAFTS_PATH_ENV, LOG_PATH_ENV], || {
            let cli = Cli::try_parse_from(["aisle", "--tree", "cats.json"]).unwrap();
            assert!(cli.command.is_none());
            assert_eq!(cli.tree, Some(PathBuf::from("cats.json")));
        });
    }

    #[test]
    fn global_options_follow_subcommands() {
        temp_env::with_vars_unset([API_BASE_ENV, DRAFTS_PATH_ENV, LOG_PATH_ENV], || {
            let cli = Cli::try_parse_from(["aisle", "select", "12", "--no-drafts"]).unwrap();
            assert_eq!(cli.command, Some(Command::Select { id: 12 }));
            assert!(cli.no_drafts);
        });
    }

    #[test]
    fn api_base_falls_back_to_env() {
        temp_env::with_var(API_BASE_ENV, Some("https://shop.example.com/api"), || {
            let cli = Cli::try_parse_from(["aisle", "tree"]).unwrap();
            assert_eq!(cli.api_base.as_deref(), Some("https://shop.example.com/api"));
        });
    }
}
