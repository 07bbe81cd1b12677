//! Where category tree snapshots come from.

use std::path::{Path, PathBuf};

use aisle_catalog::CategoryTree;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::client::CatalogClient;
use crate::error::CatalogError;
use crate::payload::{parse_tree_json, parse_tree_yaml};

/// Something that can produce a complete category tree snapshot.
#[async_trait]
pub trait CategorySource: Send + Sync {
    /// Load the whole tree.
    async fn load(&self) -> Result<CategoryTree>;

    /// Short human-readable origin, shown in the UI and logs.
    fn describe(&self) -> String;
}

/// Snapshot read from a local JSON or YAML file.
#[derive(Debug, Clone)]
pub struct FileCategorySource {
    path: PathBuf,
}

impl FileCategorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
    }
}

#[async_trait]
impl CategorySource for FileCategorySource {
    async fn load(&self) -> Result<CategoryTree> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        let tree = if self.is_yaml() {
            parse_tree_yaml(&content)?
        } else {
            parse_tree_json(&content)?
        };
        info!(path = %self.path.display(), nodes = tree.node_count(), "loaded category tree from file");
        Ok(tree)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[async_trait]
impl CategorySource for CatalogClient {
    async fn load(&self) -> Result<CategoryTree> {
        Ok(self.fetch_category_tree().await?)
    }

    fn describe(&self) -> String {
        format!("catalog API {}", self.base_url())
    }
}

/// Memoizes the first successful load for the lifetime of the process.
///
/// Failed loads are not cached; the next call retries.
pub struct SessionCachedSource<S> {
    inner: S,
    cached: OnceCell<CategoryTree>,
}

impl<S: CategorySource> SessionCachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cached: OnceCell::new(),
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cached.initialized()
    }
}

#[async_trait]
impl<S: CategorySource> CategorySource for SessionCachedSource<S> {
    async fn load(&self) -> Result<CategoryTree> {
        if let Some(tree) = self.cached.get() {
            debug!(source = %self.inner.describe(), "category tree served from session cache");
            return Ok(tree.clone());
        }
        let tree = self.cached.get_or_try_init(|| self.inner.load()).await?;
        Ok(tree.clone())
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisle_types::CategoryNode;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    struct CountingSource {
        calls: AtomicUsize,
        fail_first: bool,
    }

    #[async_trait]
    impl CategorySource for CountingSource {
        async fn load(&self) -> Result<CategoryTree> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && call == 0 {
                anyhow::bail!("catalog unavailable");
            }
            Ok(CategoryTree::new(vec![CategoryNode::leaf(1, "Books", "books")]))
        }

        fn describe(&self) -> String {
            "counting".into()
        }
    }

    #[tokio::test]
    async fn reads_json_and_yaml_files() {
        let dir = tempdir().unwrap();
        let json_path = dir.path().join("tree.json");
        fs::write(&json_path, r#"[{"id": 1, "name": "Books", "path": "books"}]"#).unwrap();
        let yaml_path = dir.path().join("tree.YML");
        fs::write(&yaml_path, "- id: 2\n  name: Music\n  path: music\n").unwrap();

        let json_tree = FileCategorySource::new(&json_path).load().await.unwrap();
        assert_eq!(json_tree.roots()[0].name, "Books");
        let yaml_tree = FileCategorySource::new(&yaml_path).load().await.unwrap();
        assert_eq!(yaml_tree.roots()[0].name, "Music");
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let source = FileCategorySource::new("/definitely/not/here.json");
        let error = source.load().await.unwrap_err();
        assert!(error.to_string().contains("/definitely/not/here.json"), "{error}");
    }

    #[tokio::test]
    async fn session_cache_loads_once() {
        let cached = SessionCachedSource::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail_first: false,
        });
        cached.load().await.unwrap();
        cached.load().await.unwrap();
        assert!(cached.is_cached());
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn session_cache_retries_after_failure() {
        let cached = SessionCachedSource::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail_first: true,
        });
        assert!(cached.load().await.is_err());
        assert!(!cached.is_cached());
        assert!(cached.load().await.is_ok());
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }
}
