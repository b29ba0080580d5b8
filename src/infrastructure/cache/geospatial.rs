//! Bounded geohash-keyed cache with per-entry TTL and LRU eviction
//!
//! Entries and metadata are serialized to opaque JSON strings against a
//! [`KeyValueStore`]; the substrate provides no cross-key atomicity, so
//! every read-modify-write sequence here runs behind a single mutation
//! mutex. Read paths never error: expired and corrupt entries are deleted
//! on sight and reported as misses.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::geo::{GeoBounds, GeoPoint, geohash};
use crate::domain::{CacheEntry, CacheMetadata, Clock, DomainError, KeyValueStore};

const ENTRY_PREFIX: &str = "geo:entry:";
const METADATA_KEY: &str = "geo:meta";

/// Configuration for [`GeospatialCache`].
#[derive(Debug, Clone)]
pub struct GeoCacheConfig {
    /// Entry time-to-live.
    pub ttl: Duration,
    /// Hard cap on stored entries; LRU-evicted beyond this.
    pub max_entries: usize,
    /// Geohash precision for keys computed from coordinates. The default
    /// of 5 (~4.9 km cells) trades exact positions for cache hits from
    /// nearby queries.
    pub precision: usize,
}

impl Default for GeoCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(6 * 3600),
            max_entries: 100,
            precision: 5,
        }
    }
}

impl GeoCacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

/// Long-lived, shared geospatial cache.
#[derive(Debug)]
pub struct GeospatialCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    config: GeoCacheConfig,
    /// Serializes metadata read-modify-write across concurrent callers.
    mutation: Mutex<()>,
}

impl GeospatialCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_config(store, clock, GeoCacheConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: GeoCacheConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            mutation: Mutex::new(()),
        }
    }

    /// The geohash key a point maps to at this cache's precision.
    pub fn key_for(&self, point: &GeoPoint) -> Result<String, DomainError> {
        geohash::encode(point, self.config.precision)
    }

    /// Looks up the cell containing `point`.
    pub async fn get_at<T: DeserializeOwned>(&self, point: &GeoPoint) -> Option<T> {
        match self.key_for(point) {
            Ok(key) => self.get(&key).await,
            Err(_) => None,
        }
    }

    /// Returns the cached value for `key` if present and fresh.
    ///
    /// Expired and unparseable entries are deleted as a side effect and
    /// reported as misses; a hit refreshes the key's access time.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let _guard = self.mutation.lock().await;
        self.get_locked(key).await
    }

    async fn get_locked<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.read(&entry_key(key)).await?;
        let now = self.clock.now();

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "removing corrupt cache entry");
                self.delete_entry_locked(key).await;
                return None;
            }
        };

        if !self.is_fresh(entry.stored_at, now) {
            debug!(key, "cache entry expired");
            self.delete_entry_locked(key).await;
            return None;
        }

        let mut meta = self.load_metadata_locked(now).await;
        meta.touch(key, now);
        if let Err(e) = self.save_metadata(&meta).await {
            // Reads degrade silently; the hit still counts.
            warn!(key, error = %e, "failed to record cache access");
        }

        Some(entry.data)
    }

    /// Stores `data` under the cell containing `point`.
    pub async fn set<T: Serialize>(&self, point: &GeoPoint, data: &T) -> Result<(), DomainError> {
        let key = self.key_for(point)?;
        let _guard = self.mutation.lock().await;
        self.set_locked(&key, data).await
    }

    /// Stores `data` under an already-computed geohash key (used for
    /// bounding-box cells that have no single source coordinate).
    pub async fn set_with_key<T: Serialize>(
        &self,
        key: &str,
        data: &T,
    ) -> Result<(), DomainError> {
        if !geohash::is_valid(key) {
            return Err(DomainError::validation(format!(
                "invalid geohash key '{}'",
                key
            )));
        }

        let _guard = self.mutation.lock().await;
        self.set_locked(key, data).await
    }

    async fn set_locked<T: Serialize>(&self, key: &str, data: &T) -> Result<(), DomainError> {
        let now = self.clock.now();
        let entry = CacheEntry::new(data, now, key);
        let json = serde_json::to_string(&entry)
            .map_err(|e| DomainError::serialization(format!("encode cache entry: {}", e)))?;

        if !self.store.write(&entry_key(key), &json).await {
            return Err(DomainError::storage(format!(
                "substrate rejected write for '{}'",
                key
            )));
        }

        let mut meta = self.load_metadata_locked(now).await;
        meta.touch(key, now);
        self.enforce_capacity(&mut meta).await;
        self.save_metadata(&meta).await
    }

    /// Evicts least-recently-used entries until the cap is respected.
    async fn enforce_capacity(&self, meta: &mut CacheMetadata) {
        while meta.total_entries > self.config.max_entries {
            let Some(victim) = meta.least_recently_used().map(str::to_string) else {
                break;
            };
            debug!(key = %victim, "evicting least-recently-used cache entry");
            self.store.remove(&entry_key(&victim)).await;
            meta.forget(&victim);
        }
    }

    /// Removes one entry; returns whether it existed.
    pub async fn remove(&self, key: &str) -> bool {
        let _guard = self.mutation.lock().await;

        let existed = self.store.remove(&entry_key(key)).await;
        let now = self.clock.now();
        let mut meta = self.load_metadata_locked(now).await;
        if meta.forget(key) {
            if let Err(e) = self.save_metadata(&meta).await {
                warn!(key, error = %e, "failed to update metadata after remove");
            }
        }

        existed
    }

    /// Drops every entry and the metadata document.
    pub async fn clear(&self) {
        let _guard = self.mutation.lock().await;

        for key in self.store.list_keys().await {
            if key.starts_with(ENTRY_PREFIX) || key == METADATA_KEY {
                self.store.remove(&key).await;
            }
        }
    }

    /// Current bookkeeping snapshot (created lazily if absent).
    pub async fn metadata(&self) -> CacheMetadata {
        let _guard = self.mutation.lock().await;
        self.load_metadata_locked(self.clock.now()).await
    }

    /// Sweeps all entries, deleting expired and corrupt ones independently
    /// of any lookup. Returns the number of entries removed.
    pub async fn cleanup(&self) -> usize {
        let _guard = self.mutation.lock().await;

        let now = self.clock.now();
        let mut meta = self.load_metadata_locked(now).await;
        let mut removed = 0usize;
        let mut live: BTreeSet<String> = BTreeSet::new();

        for store_key in self.store.list_keys().await {
            let Some(key) = store_key.strip_prefix(ENTRY_PREFIX) else {
                continue;
            };

            let keep = match self.store.read(&store_key).await {
                Some(raw) => match serde_json::from_str::<CacheEntry<serde_json::Value>>(&raw) {
                    Ok(entry) => self.is_fresh(entry.stored_at, now),
                    Err(e) => {
                        warn!(key, error = %e, "cleanup removing corrupt entry");
                        false
                    }
                },
                None => false,
            };

            if keep {
                if !meta.access_log.contains_key(key) {
                    meta.touch(key, now);
                }
                live.insert(key.to_string());
            } else {
                self.store.remove(&store_key).await;
                removed += 1;
            }
        }

        meta.access_log.retain(|key, _| live.contains(key));
        meta.total_entries = meta.access_log.len();
        meta.last_cleanup = now;
        if let Err(e) = self.save_metadata(&meta).await {
            warn!(error = %e, "failed to persist metadata after cleanup");
        }

        removed
    }

    /// Geohash cells covering a viewport at this cache's precision.
    pub fn covering_keys(&self, bounds: &GeoBounds) -> Result<BTreeSet<String>, DomainError> {
        geohash::cover_bounds(bounds, self.config.precision)
    }

    /// All live cached values for cells covering `bounds`.
    pub async fn get_area<T: DeserializeOwned>(&self, bounds: &GeoBounds) -> Vec<(String, T)> {
        let Ok(keys) = self.covering_keys(bounds) else {
            return Vec::new();
        };

        let mut hits = Vec::new();
        for key in keys {
            if let Some(data) = self.get(&key).await {
                hits.push((key, data));
            }
        }
        hits
    }

    fn is_fresh(&self, stored_at: chrono::DateTime<chrono::Utc>, now: chrono::DateTime<chrono::Utc>) -> bool {
        match now.signed_duration_since(stored_at).to_std() {
            Ok(age) => age < self.config.ttl,
            // Stored in the future: the clock moved backwards, keep it.
            Err(_) => true,
        }
    }

    async fn delete_entry_locked(&self, key: &str) {
        self.store.remove(&entry_key(key)).await;

        let now = self.clock.now();
        let mut meta = self.load_metadata_locked(now).await;
        if meta.forget(key) {
            if let Err(e) = self.save_metadata(&meta).await {
                warn!(key, error = %e, "failed to update metadata after delete");
            }
        }
    }

    /// Loads metadata, creating it lazily and self-healing corruption by
    /// rebuilding the access log from the substrate key listing.
    async fn load_metadata_locked(&self, now: chrono::DateTime<chrono::Utc>) -> CacheMetadata {
        match self.store.read(METADATA_KEY).await {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(meta) => meta,
                Err(e) => {
                    warn!(error = %e, "cache metadata corrupt; rebuilding from key listing");
                    self.rebuild_metadata(now).await
                }
            },
            None => CacheMetadata::new(now),
        }
    }

    async fn rebuild_metadata(&self, now: chrono::DateTime<chrono::Utc>) -> CacheMetadata {
        let mut meta = CacheMetadata::new(now);
        for store_key in self.store.list_keys().await {
            if let Some(key) = store_key.strip_prefix(ENTRY_PREFIX) {
                meta.touch(key, now);
            }
        }
        meta
    }

    async fn save_metadata(&self, meta: &CacheMetadata) -> Result<(), DomainError> {
        let json = serde_json::to_string(meta)
            .map_err(|e| DomainError::serialization(format!("encode cache metadata: {}", e)))?;

        if !self.store.write(METADATA_KEY, &json).await {
            return Err(DomainError::storage("substrate rejected metadata write"));
        }
        Ok(())
    }
}

fn entry_key(key: &str) -> String {
    format!("{}{}", ENTRY_PREFIX, key)
}
