use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cached value together with its bookkeeping fields.
///
/// `stored_at` is always UTC; `key` is the geohash the entry was stored
/// under, repeated inside the payload so a raw substrate string is
/// self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub stored_at: DateTime<Utc>,
    pub key: String,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, stored_at: DateTime<Utc>, key: impl Into<String>) -> Self {
        Self {
            data,
            stored_at,
            key: key.into(),
        }
    }
}

/// Cache-wide bookkeeping, persisted as its own substrate document.
///
/// Created lazily on first use, mutated on every get/set/remove, removed
/// only by an explicit `clear()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub total_entries: usize,
    pub last_cleanup: DateTime<Utc>,
    /// Last access time per geohash key; drives LRU eviction.
    pub access_log: BTreeMap<String, DateTime<Utc>>,
}

impl CacheMetadata {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            total_entries: 0,
            last_cleanup: created_at,
            access_log: BTreeMap::new(),
        }
    }

    /// Records an access (read or write) for `key`, admitting it if new.
    pub fn touch(&mut self, key: &str, at: DateTime<Utc>) {
        self.access_log.insert(key.to_string(), at);
        self.total_entries = self.access_log.len();
    }

    /// Forgets `key`; returns whether it was tracked.
    pub fn forget(&mut self, key: &str) -> bool {
        let removed = self.access_log.remove(key).is_some();
        self.total_entries = self.access_log.len();
        removed
    }

    /// Key with the oldest access time, if any.
    pub fn least_recently_used(&self) -> Option<&str> {
        self.access_log
            .iter()
            .min_by_key(|(_, at)| *at)
            .map(|(key, _)| key.as_str())
    }

    /// Invariant check: every tracked key is counted exactly once.
    pub fn is_consistent(&self) -> bool {
        self.total_entries == self.access_log.len()
    }
}
