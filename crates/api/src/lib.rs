//! Aisle catalog API client and category tree sources.
//!
//! The category tree is owned by the remote catalog service. This crate
//! only knows how to obtain a complete snapshot of it:
//!
//! - [`CatalogClient`]: `GET {base}/categories` with an optional bearer token
//! - [`FileCategorySource`]: a local JSON or YAML snapshot
//! - [`SessionCachedSource`]: memoizes the first successful load per process
//!
//! Base URLs are validated: hosts other than `localhost`/`127.0.0.1` must use HTTPS.
//!
//! ```ignore
//! use aisle_api::{CatalogClient, CatalogConfig, CategorySource};
//!
//! let client = CatalogClient::new(CatalogConfig::from_env(None))?;
//! let tree = client.load().await?;
//! ```

mod client;
mod error;
mod payload;
mod source;

pub use client::{API_BASE_ENV, API_TOKEN_ENV, CatalogClient, CatalogConfig, DEFAULT_API_BASE, validate_base_url};
pub use error::CatalogError;
pub use payload::{parse_tree_json, parse_tree_yaml};
pub use source::{CategorySource, FileCategorySource, SessionCachedSource};
