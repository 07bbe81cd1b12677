//! Application state and the message/effect vocabulary of the TUI.
//!
//! `App` is the single owner of UI state. Input and background results are
//! fed in as [`Msg`]s or through components; anything that has to leave the
//! pure state update (persisting drafts, spawning loads, quitting) is
//! reported back as an [`Effect`] and carried out by the runtime.

use std::sync::Arc;

use aisle_api::CategorySource;
use aisle_catalog::CategoryTree;
use aisle_types::{CategoryId, FULL_PATH_DELIMITER, SelectionPath};
use aisle_util::{DraftStore, DraftStoreError};
use rat_focus::{Focus, FocusBuilder};
use tracing::{info, warn};

use crate::ui::components::category_selector::CategorySelectorState;
use crate::ui::theme::{self, Theme};

/// Draft key holding the id of the last emitted selection.
pub const SELECTION_DRAFT_KEY: &str = "category_selector.selection";

/// Messages delivered to the application and its components.
#[derive(Debug)]
pub enum Msg {
    /// The background category load finished.
    CategoriesLoaded(Result<CategoryTree, String>),
    Resize(u16, u16),
    Tick,
}

/// Side effects requested by the state update, executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The selector emitted a new selection path.
    SelectionChanged(SelectionPath),
    /// (Re)load the category tree from the configured source.
    LoadCategories,
    Quit,
}

/// Lifecycle of the category tree snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready {
        nodes: usize,
    },
    Failed(String),
}

/// Cross-cutting context shared by all components.
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
    pub drafts: Arc<dyn DraftStore>,
    pub source: Arc<dyn CategorySource>,
    /// Human-readable origin of the tree, e.g. `file ./categories.json`.
    pub source_label: String,
}

impl SharedCtx {
    pub fn new(source: Arc<dyn CategorySource>, drafts: Arc<dyn DraftStore>) -> Self {
        let source_label = source.describe();
        Self {
            theme: theme::load_from_env(),
            drafts,
            source,
            source_label,
        }
    }
}

const THROBBER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

pub struct App {
    pub ctx: SharedCtx,
    pub selector: CategorySelectorState,
    pub focus: Focus,
    pub load_status: LoadStatus,
    /// Most recent user-facing notice, shown in the status line.
    pub status_message: Option<String>,
    pub throbber_idx: usize,
    pending_restore: Option<CategoryId>,
}

impl App {
    pub fn new(ctx: SharedCtx) -> Self {
        let pending_restore = read_selection_draft(ctx.drafts.as_ref());
        let selector = CategorySelectorState::default();
        let focus = FocusBuilder::build_for(&selector);
        focus.first();
        Self {
            ctx,
            selector,
            focus,
            load_status: LoadStatus::Idle,
            status_message: None,
            throbber_idx: 0,
            pending_restore,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load_status, LoadStatus::Loading)
    }

    pub fn throbber(&self) -> &'static str {
        THROBBER[self.throbber_idx % THROBBER.len()]
    }

    pub fn mark_loading(&mut self) {
        self.load_status = LoadStatus::Loading;
        self.throbber_idx = 0;
    }

    /// Apply an application message and return the effects it triggers.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::CategoriesLoaded(Ok(tree)) => {
                let nodes = tree.node_count();
                self.selector.load_tree(tree.clone());
                self.load_status = LoadStatus::Ready { nodes };
                self.status_message = None;
                let mut effects = Vec::new();
                if let Some(id) = self.pending_restore.take()
                    && let Some(path) = self.selector.restore(id)
                {
                    info!(id = %id, "restored category selection from draft");
                    effects.push(Effect::SelectionChanged(path));
                }
                effects
            }
            Msg::CategoriesLoaded(Err(error)) => {
                warn!(%error, source = %self.ctx.source_label, "category load failed");
                self.status_message = Some(format!("Could not load categories: {error}"));
                self.load_status = LoadStatus::Failed(error.clone());
                Vec::new()
            }
            Msg::Tick => {
                if self.is_loading() {
                    self.throbber_idx = (self.throbber_idx + 1) % THROBBER.len();
                }
                Vec::new()
            }
            Msg::Resize(..) => Vec::new(),
        }
    }

    /// Host-side handling of an emitted selection: persist it as a draft and log it.
    pub fn persist_selection(&mut self, path: &SelectionPath) {
        let result = match path.last() {
            Some(node) => serde_json::to_value(node.id)
                .map_err(DraftStoreError::from)
                .and_then(|value| self.ctx.drafts.set(SELECTION_DRAFT_KEY, value)),
            None => self.ctx.drafts.remove(SELECTION_DRAFT_KEY),
        };
        if let Err(error) = result {
            warn!(%error, "failed to persist category selection draft");
            self.status_message = Some(format!("Selection draft not saved: {error}"));
        }

        let breadcrumb = path.breadcrumb(FULL_PATH_DELIMITER);
        match path.public_url() {
            Some(url) => info!(%breadcrumb, %url, "category selected"),
            None if path.is_empty() => info!("category selection cleared"),
            None => info!(%breadcrumb, "category branch selected"),
        }
    }
}

fn read_selection_draft(drafts: &dyn DraftStore) -> Option<CategoryId> {
    match drafts.get(SELECTION_DRAFT_KEY) {
        Ok(Some(value)) => match serde_json::from_value::<CategoryId>(value) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "ignoring malformed category selection draft");
                None
            }
        },
        Ok(None) => None,
        Err(error) => {
            warn!(%error, "failed to read category selection draft");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisle_types::CategoryNode;
    use aisle_util::InMemoryDraftStore;
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticSource;

    #[async_trait]
    impl CategorySource for StaticSource {
        async fn load(&self) -> anyhow::Result<CategoryTree> {
            Ok(tree())
        }

        fn describe(&self) -> String {
            "static".into()
        }
    }

    fn tree() -> CategoryTree {
        CategoryTree::new(vec![CategoryNode::branch(
            1,
            "Electronics",
            "/electronics",
            vec![CategoryNode::leaf(2, "Laptops", "/electronics/laptops")],
        )])
    }

    fn app_with(drafts: Arc<InMemoryDraftStore>) -> App {
        App::new(SharedCtx::new(Arc::new(StaticSource), drafts))
    }

    #[test]
    fn restores_persisted_selection_once_tree_loads() {
        let drafts = Arc::new(InMemoryDraftStore::new());
        drafts.set(SELECTION_DRAFT_KEY, json!(2)).unwrap();
        let mut app = app_with(drafts);

        let effects = app.update(&Msg::CategoriesLoaded(Ok(tree())));
        assert_eq!(app.load_status, LoadStatus::Ready { nodes: 2 });
        let [Effect::SelectionChanged(path)] = effects.as_slice() else {
            panic!("expected a single selection effect, got {effects:?}");
        };
        assert_eq!(path.ids(), vec![CategoryId(1), CategoryId(2)]);
        assert!(!app.selector.selector().list_visible());

        assert!(app.update(&Msg::CategoriesLoaded(Ok(tree()))).is_empty());
    }

    #[test]
    fn malformed_draft_is_ignored() {
        let drafts = Arc::new(InMemoryDraftStore::new());
        drafts.set(SELECTION_DRAFT_KEY, json!("not an id")).unwrap();
        let mut app = app_with(drafts);
        assert!(app.update(&Msg::CategoriesLoaded(Ok(tree()))).is_empty());
    }

    #[test]
    fn persisting_writes_and_clears_the_draft() {
        let drafts = Arc::new(InMemoryDraftStore::new());
        let mut app = app_with(drafts.clone());
        app.update(&Msg::CategoriesLoaded(Ok(tree())));

        let path = app.selector.select_cursor().unwrap();
        app.persist_selection(&path);
        assert_eq!(drafts.get(SELECTION_DRAFT_KEY).unwrap(), Some(json!(1)));

        let cleared = app.selector.reset().unwrap();
        app.persist_selection(&cleared);
        assert!(drafts.get(SELECTION_DRAFT_KEY).unwrap().is_none());
    }

    #[test]
    fn load_failure_is_reported() {
        let mut app = app_with(Arc::new(InMemoryDraftStore::new()));
        app.mark_loading();
        app.update(&Msg::Tick);
        assert_eq!(app.throbber_idx, 1);

        app.update(&Msg::CategoriesLoaded(Err("connection refused".into())));
        assert_eq!(app.load_status, LoadStatus::Failed("connection refused".into()));
        assert!(app.status_message.as_deref().is_some_and(|message| message.contains("connection refused")));
    }
}
