//! Cache-Backed Fetcher
//!
//! Get-or-compute wrapper around any async producer, persisted in a
//! [`KvStore`] with per-entry expiry.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::entry::{current_timestamp_ms, CacheEntry};
use crate::cache::stats::{FetcherCounters, FetcherStats};
use crate::cache::KvStore;

// == Cache Fetcher ==
/// Serves fresh entries from the durable store and refills it on a miss.
///
/// Store failures never reach the caller: a failed read is a miss and a
/// failed write is logged while the freshly produced value is still
/// returned. Concurrent misses on one key each run the producer and the
/// last write wins.
pub struct CacheFetcher {
    store: Arc<dyn KvStore>,
    /// tag -> keys written with that tag
    tag_index: Mutex<HashMap<String, HashSet<String>>>,
    counters: FetcherCounters,
}

impl CacheFetcher {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            tag_index: Mutex::new(HashMap::new()),
            counters: FetcherCounters::default(),
        }
    }

    // == Fetch Or Compute ==
    /// Returns the cached value for `key` if younger than `ttl_secs`,
    /// otherwise awaits `producer`, stores its result with a store-level
    /// expiry of `ttl_secs`, and returns it.
    ///
    /// Producer errors are returned unchanged and nothing is cached.
    pub async fn fetch_or_compute<T, E, F, Fut>(
        &self,
        key: &str,
        producer: F,
        ttl_secs: u64,
        tag: Option<&str>,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(data) = self.read_fresh::<T>(key, ttl_secs).await {
            return Ok(data);
        }

        debug!(key, "Cache miss, fetching fresh data");
        self.counters.miss();
        let data = producer().await?;

        self.write(key, &data, ttl_secs, tag).await;
        Ok(data)
    }

    async fn read_fresh<T: DeserializeOwned>(&self, key: &str, ttl_secs: u64) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "Error reading from cache");
                self.counters.read_error();
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "Unreadable cache entry");
                self.counters.read_error();
                return None;
            }
        };

        let now = current_timestamp_ms();
        let age = entry.age_secs(now);
        if entry.is_fresh(ttl_secs, now) {
            debug!(key, age = %format!("{:.2}s", age), "Cache hit");
            self.counters.hit();
            Some(entry.data)
        } else {
            debug!(key, age = %format!("{:.2}s", age), "Cache expired");
            self.counters.stale();
            None
        }
    }

    async fn write<T: Serialize>(
        &self,
        key: &str,
        data: &T,
        ttl_secs: u64,
        tag: Option<&str>,
    ) {
        let entry = CacheEntry::new(data, tag.map(str::to_string));

        let encoded = match serde_json::to_string(&entry) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key, error = %e, "Error encoding cache entry");
                self.counters.write_error();
                return;
            }
        };

        match self.store.set(key, encoded, ttl_secs).await {
            Ok(()) => self.index_tag(key, tag).await,
            Err(e) => {
                warn!(key, error = %e, "Error writing to cache");
                self.counters.write_error();
            }
        }
    }

    // == Invalidation ==
    /// Removes a single key. Failures are logged and swallowed.
    pub async fn invalidate(&self, key: &str) {
        if let Err(e) = self.store.del(key).await {
            warn!(key, error = %e, "Error invalidating cache key");
        }
        remove_from_index(&mut *self.tag_index.lock().await, key);
    }

    /// Removes every key last written with `tag` and returns how many
    /// live entries were deleted.
    ///
    /// Keys come from the tag index kept on writes, so the store is never
    /// scanned. Indexed keys the store already evicted or expired are
    /// dropped without being counted.
    pub async fn invalidate_by_tag(&self, tag: &str) -> usize {
        let keys = self.tag_index.lock().await.remove(tag).unwrap_or_default();

        let mut removed = 0;
        for key in keys {
            match self.store.del(&key).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => warn!(tag, key = %key, error = %e, "Error invalidating cache by tag"),
            }
        }

        debug!(tag, removed, "Invalidated cache tag");
        removed
    }

    /// Drops index entries whose key the store no longer holds and returns
    /// how many were dropped.
    ///
    /// Evictions and expirations happen inside the store and never reach
    /// the index. The index stays locked while live keys are listed, so a
    /// concurrent write re-indexes its key afterwards.
    pub async fn prune_index(&self) -> usize {
        let mut index = self.tag_index.lock().await;

        let live: HashSet<String> = match self.store.keys("*").await {
            Ok(keys) => keys.into_iter().collect(),
            Err(e) => {
                warn!(error = %e, "Error listing cache keys, tag index not pruned");
                return 0;
            }
        };

        let mut pruned = 0;
        index.retain(|_, keys| {
            let before = keys.len();
            keys.retain(|key| live.contains(key));
            pruned += before - keys.len();
            !keys.is_empty()
        });
        pruned
    }

    /// Number of keys held by the tag index across all tags.
    pub async fn indexed_len(&self) -> usize {
        self.tag_index.lock().await.values().map(HashSet::len).sum()
    }

    pub fn stats(&self) -> FetcherStats {
        self.counters.snapshot()
    }

    // == Tag Index ==
    /// A rewrite replaces the entry's tag, so the key leaves any other set.
    async fn index_tag(&self, key: &str, tag: Option<&str>) {
        let mut index = self.tag_index.lock().await;
        remove_from_index(&mut index, key);
        if let Some(tag) = tag {
            index
                .entry(tag.to_string())
                .or_default()
                .insert(key.to_string());
        }
    }
}

fn remove_from_index(index: &mut HashMap<String, HashSet<String>>, key: &str) {
    index.retain(|_, keys| {
        keys.remove(key);
        !keys.is_empty()
    });
}
