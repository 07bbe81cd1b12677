//! Utility helpers shared across the Aisle crates: draft persistence,
//! config paths and display-width text handling.

pub mod draft_store;
pub mod path_processing;
pub mod text_processing;

pub use draft_store::{DRAFTS_PATH_ENV, DraftStore, DraftStoreError, InMemoryDraftStore, JsonDraftStore};
pub use path_processing::{app_config_dir, expand_tilde, path_from_env_or_config};
pub use text_processing::{truncate_start_to_width, truncate_to_width};
