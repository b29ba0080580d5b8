//! Single-file persistent key-value store
//!
//! The whole map is one JSON document, loaded on open and rewritten on
//! every mutation. Sized for a single client device's cache (at most a few
//! hundred small entries), so whole-document rewrites stay cheap.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{DomainError, KeyValueStore};

/// JSON-document store persisted at a local path.
///
/// A missing file starts empty; a corrupt file is discarded with a warning
/// and the store recovers to empty rather than failing to open.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DomainError::storage(format!("create {}: {}", parent.display(), e)))?;
            }
        }

        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cache store file corrupt; starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Rewrites the backing file from the in-memory map.
    fn persist(&self) -> bool {
        let serialized = {
            let entries = self.entries.read().unwrap();
            match serde_json::to_string(&*entries) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "cache store serialization failed");
                    return false;
                }
            }
        };

        if let Err(e) = std::fs::write(&self.path, serialized) {
            warn!(path = %self.path.display(), error = %e, "cache store write failed");
            return false;
        }
        true
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn read(&self, key: &str) -> Option<String> {
        self.entries.read().unwrap().get(key).cloned()
    }

    async fn write(&self, key: &str, value: &str) -> bool {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.persist()
    }

    async fn remove(&self, key: &str) -> bool {
        let existed = self.entries.write().unwrap().remove(key).is_some();
        if existed {
            self.persist();
        }
        existed
    }

    async fn list_keys(&self) -> BTreeSet<String> {
        self.entries.read().unwrap().keys().cloned().collect()
    }
}
