//! Shared type definitions for the Aisle storefront workspace.
//!
//! The category tree is fetched as a complete snapshot by the caller and
//! handed to the selector; the types here describe that snapshot and the
//! selection path the selector emits.

pub mod category;
pub mod selection;

pub use category::{CategoryId, CategoryNode, FULL_PATH_DELIMITER, category_url, normalize_term};
pub use selection::SelectionPath;
