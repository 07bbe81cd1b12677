//! # Aisle catalog
//!
//! Framework-agnostic core of the storefront category selector:
//!
//! - [`CategoryTree`]: immutable snapshot with depth-first ancestor resolution
//! - [`search`]: recursive substring filter that keeps ancestor context
//! - [`rows`]: flattening into `{node, depth}` rows for any rendering layer
//! - [`SelectorState`]: selection path, expanded set and list visibility,
//!   driven by [`SelectorAction`]s
//!
//! Nothing in this crate performs I/O; the tree is supplied by the caller.

pub mod rows;
pub mod search;
pub mod selector;
pub mod tree;

pub use rows::{TreeRow, flatten_all, flatten_hits, flatten_level};
pub use search::{SearchHit, auto_expanded, filter};
pub use selector::{Listing, SelectorAction, SelectorPhase, SelectorState, reduce};
pub use tree::CategoryTree;
