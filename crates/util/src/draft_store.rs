//! Key-value persistence for in-progress form drafts.
//!
//! UI code never reaches for a global store; it receives a [`DraftStore`]
//! and can be handed the JSON file implementation, the in-memory one, or
//! any other backend.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::serde::ts_seconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::path_processing::{expand_tilde, path_from_env_or_config};

/// Environment variable controlling the drafts file location.
pub const DRAFTS_PATH_ENV: &str = "AISLE_DRAFTS_PATH";

/// Default filename for the persisted drafts.
pub const DRAFTS_FILE_NAME: &str = "drafts.json";

/// Errors surfaced by draft store operations.
#[derive(Debug, Error)]
pub enum DraftStoreError {
    #[error("draft I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("draft serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Capability to read, write and forget draft values by key.
pub trait DraftStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, DraftStoreError>;

    fn set(&self, key: &str, value: Value) -> Result<(), DraftStoreError>;

    fn remove(&self, key: &str) -> Result<(), DraftStoreError>;
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
struct StoredDraft {
    value: Value,
    #[serde(with = "ts_seconds")]
    updated_at: DateTime<Utc>,
}

#[derive(Default, Serialize, Deserialize)]
struct DraftFile {
    drafts: BTreeMap<String, StoredDraft>,
}

impl DraftFile {
    fn get(&self, key: &str) -> Option<Value> {
        self.drafts.get(key).map(|draft| draft.value.clone())
    }

    fn set(&mut self, key: &str, value: Value) {
        self.drafts.insert(
            key.to_string(),
            StoredDraft {
                value,
                updated_at: Utc::now(),
            },
        );
    }

    /// Returns `true` when something was removed.
    fn remove(&mut self, key: &str) -> bool {
        self.drafts.remove(key).is_some()
    }
}

/// Drafts persisted as a single JSON document on disk.
pub struct JsonDraftStore {
    path: PathBuf,
    file: Mutex<DraftFile>,
}

impl JsonDraftStore {
    /// Open the store at `path`, or at the default location when `None`.
    pub fn new<P: Into<Option<PathBuf>>>(path: P) -> Result<Self, DraftStoreError> {
        let resolved_path = match path.into() {
            Some(path) => expand_tilde(&path.to_string_lossy()),
            None => default_drafts_path(),
        };
        let file = load_draft_file(&resolved_path)?;
        debug!(path = %resolved_path.display(), entries = file.drafts.len(), "opened draft store");
        Ok(Self {
            path: resolved_path,
            file: Mutex::new(file),
        })
    }

    pub fn with_defaults() -> Result<Self, DraftStoreError> {
        Self::new(None::<PathBuf>)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_locked(&self, file: &DraftFile) -> Result<(), DraftStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl DraftStore for JsonDraftStore {
    fn get(&self, key: &str) -> Result<Option<Value>, DraftStoreError> {
        let file = self.file.lock().expect("draft lock poisoned");
        Ok(file.get(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), DraftStoreError> {
        let mut file = self.file.lock().expect("draft lock poisoned");
        file.set(key, value);
        self.save_locked(&file)
    }

    fn remove(&self, key: &str) -> Result<(), DraftStoreError> {
        let mut file = self.file.lock().expect("draft lock poisoned");
        if file.remove(key) {
            self.save_locked(&file)?;
        }
        Ok(())
    }
}

/// Process-local drafts; used in tests and when drafts are disabled.
#[derive(Default)]
pub struct InMemoryDraftStore {
    file: Mutex<DraftFile>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for InMemoryDraftStore {
    fn get(&self, key: &str) -> Result<Option<Value>, DraftStoreError> {
        Ok(self.file.lock().expect("draft lock poisoned").get(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), DraftStoreError> {
        self.file.lock().expect("draft lock poisoned").set(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DraftStoreError> {
        self.file.lock().expect("draft lock poisoned").remove(key);
        Ok(())
    }
}

fn default_drafts_path() -> PathBuf {
    path_from_env_or_config(DRAFTS_PATH_ENV, DRAFTS_FILE_NAME)
}

fn load_draft_file(path: &Path) -> Result<DraftFile, DraftStoreError> {
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<DraftFile>(&content) {
            Ok(file) => Ok(file),
            Err(error) => {
                warn!("Failed to parse drafts file at {}: {}", path.display(), error);
                Ok(DraftFile::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(DraftFile::default()),
        Err(error) => Err(DraftStoreError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn in_memory_store_round_trip() {
        let store = InMemoryDraftStore::new();
        assert!(store.get("onboarding").unwrap().is_none());

        store.set("onboarding", json!({"step": 2})).unwrap();
        assert_eq!(store.get("onboarding").unwrap(), Some(json!({"step": 2})));

        store.remove("onboarding").unwrap();
        assert!(store.get("onboarding").unwrap().is_none());
    }

    #[test]
    fn json_store_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("drafts.json");
        let store = JsonDraftStore::new(Some(path.clone())).unwrap();
        store.set("category_selector.selection", json!(12)).unwrap();
        drop(store);

        let reopened = JsonDraftStore::new(Some(path)).unwrap();
        assert_eq!(reopened.get("category_selector.selection").unwrap(), Some(json!(12)));
    }

    #[test]
    fn json_store_remove_is_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("drafts.json");
        let store = JsonDraftStore::new(Some(path.clone())).unwrap();
        store.set("a", json!("x")).unwrap();
        store.set("b", json!("y")).unwrap();
        store.remove("a").unwrap();
        store.remove("missing").unwrap();
        drop(store);

        let reopened = JsonDraftStore::new(Some(path)).unwrap();
        assert!(reopened.get("a").unwrap().is_none());
        assert_eq!(reopened.get("b").unwrap(), Some(json!("y")));
    }

    #[test]
    fn corrupt_file_yields_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("drafts.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonDraftStore::new(Some(path)).unwrap();
        assert!(store.get("anything").unwrap().is_none());
    }

    #[test]
    fn default_path_honors_env_override() {
        temp_env::with_var(DRAFTS_PATH_ENV, Some("/tmp/aisle-test/drafts.json"), || {
            assert_eq!(default_drafts_path(), PathBuf::from("/tmp/aisle-test/drafts.json"));
        });
    }
}
