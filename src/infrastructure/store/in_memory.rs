//! In-memory key-value store

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::KeyValueStore;

/// HashMap-backed store; the default substrate when no persistence is
/// configured, and the workhorse for tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn read(&self, key: &str) -> Option<String> {
        self.entries.read().unwrap().get(key).cloned()
    }

    async fn write(&self, key: &str, value: &str) -> bool {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        true
    }

    async fn remove(&self, key: &str) -> bool {
        self.entries.write().unwrap().remove(key).is_some()
    }

    async fn list_keys(&self) -> BTreeSet<String> {
        self.entries.read().unwrap().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_remove() {
        let store = InMemoryStore::new();

        assert!(store.write("gcvwr", "payload").await);
        assert_eq!(store.read("gcvwr").await, Some("payload".to_string()));

        assert!(store.remove("gcvwr").await);
        assert!(!store.remove("gcvwr").await);
        assert_eq!(store.read("gcvwr").await, None);
    }

    #[tokio::test]
    async fn test_list_keys_is_sorted() {
        let store = InMemoryStore::with_entries([
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
            ("c".to_string(), "3".to_string()),
        ]);

        let keys: Vec<_> = store.list_keys().await.into_iter().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_overwrite_keeps_single_entry() {
        let store = InMemoryStore::new();

        store.write("k", "v1").await;
        store.write("k", "v2").await;

        assert_eq!(store.len(), 1);
        assert_eq!(store.read("k").await, Some("v2".to_string()));
    }
}
