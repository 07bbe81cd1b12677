//! # Aisle TUI
//!
//! Terminal front end for the hierarchical category selector. The selector
//! logic itself lives in `aisle-catalog`; this crate owns the terminal
//! lifecycle, focus handling, rendering and the wiring of selection changes
//! into the draft store.

mod app;
mod ui;

use std::sync::Arc;

use aisle_api::CategorySource;
use aisle_util::DraftStore;
use anyhow::Result;

pub use app::SELECTION_DRAFT_KEY;

/// Runs the interactive category selector until the user quits.
///
/// The tree is loaded from `source` in the background once the event loop is
/// running. Every emitted selection is persisted to `drafts` under
/// [`SELECTION_DRAFT_KEY`], and a previously persisted selection is restored
/// as soon as the tree arrives.
///
/// # Errors
///
/// Terminal setup and teardown failures (raw mode, alternate screen, draw).
pub async fn run(source: Arc<dyn CategorySource>, drafts: Arc<dyn DraftStore>) -> Result<()> {
    ui::runtime::run_app(source, drafts).await
}
