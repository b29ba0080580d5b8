use std::collections::BTreeSet;
use std::fmt::Debug;

use async_trait::async_trait;

/// Persistent substrate backing the geospatial cache.
///
/// Values are opaque strings; the substrate provides no atomicity across
/// keys. Write failures surface as `false`, read failures as `None` -- the
/// cache above turns both into misses or `Storage` errors as appropriate.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    async fn read(&self, key: &str) -> Option<String>;

    async fn write(&self, key: &str, value: &str) -> bool;

    async fn remove(&self, key: &str) -> bool;

    async fn list_keys(&self) -> BTreeSet<String>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store with failure injection for cache tests.
    #[derive(Debug, Default)]
    pub struct MockStore {
        entries: Mutex<HashMap<String, String>>,
        fail_writes: Mutex<bool>,
    }

    impl MockStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry(self, key: &str, value: &str) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            self
        }

        /// All subsequent writes report failure.
        pub fn fail_writes(&self, fail: bool) {
            *self.fail_writes.lock().unwrap() = fail;
        }

        pub fn raw(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        pub fn insert_raw(&self, key: &str, value: &str) {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
        }
    }

    #[async_trait]
    impl KeyValueStore for MockStore {
        async fn read(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        async fn write(&self, key: &str, value: &str) -> bool {
            if *self.fail_writes.lock().unwrap() {
                return false;
            }
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            true
        }

        async fn remove(&self, key: &str) -> bool {
            self.entries.lock().unwrap().remove(key).is_some()
        }

        async fn list_keys(&self) -> BTreeSet<String> {
            self.entries.lock().unwrap().keys().cloned().collect()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_store_round_trip() {
            let store = MockStore::new();

            assert!(store.write("k", "v").await);
            assert_eq!(store.read("k").await, Some("v".to_string()));
            assert!(store.remove("k").await);
            assert!(!store.remove("k").await);
        }

        #[tokio::test]
        async fn test_mock_store_write_failure() {
            let store = MockStore::new();
            store.fail_writes(true);

            assert!(!store.write("k", "v").await);
            assert_eq!(store.read("k").await, None);
        }
    }
}
