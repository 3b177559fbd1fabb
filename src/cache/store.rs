//! Durable Store Module
//!
//! Key-value store interface used by the cache-backed fetcher, and the
//! in-process implementation the service runs with.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{LruTracker, StoreStats, MAX_KEY_LENGTH};
use crate::error::StoreError;

// == KvStore Trait ==
/// Plain get/set-with-expiry key-value store.
///
/// Values are opaque strings in the store's encoding (JSON). No
/// transactional guarantees: concurrent writers to one key race and the
/// last write wins.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the live value for `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, expiring after `ttl_secs` seconds.
    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), StoreError>;

    /// Removes `key` and reports whether a live entry was there. Removing
    /// an absent key is not an error.
    async fn del(&self, key: &str) -> Result<bool, StoreError>;

    /// Lists live keys matching a glob pattern (`*` and `?`).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError>;
}

// == Stored Value ==
#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    /// Expiration timestamp (Unix milliseconds)
    expires_at: i64,
}

impl StoredValue {
    /// Expired once the current time reaches the expiration time.
    fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at
    }
}

#[derive(Debug)]
struct Inner {
    entries: HashMap<String, StoredValue>,
    lru: LruTracker,
    stats: StoreStats,
    max_entries: usize,
}

impl Inner {
    fn drop_key(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());
        removed
    }
}

// == Memory Store ==
/// In-process [`KvStore`] with per-entry expiry and LRU eviction at capacity.
#[derive(Debug)]
pub struct MemoryKvStore {
    inner: RwLock<Inner>,
}

impl MemoryKvStore {
    // == Constructor ==
    /// Creates a store that holds at most `max_entries` live entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                lru: LruTracker::new(),
                stats: StoreStats::default(),
                max_entries,
            }),
        }
    }

    // == Stats ==
    pub async fn stats(&self) -> StoreStats {
        let inner = self.inner.read().await;
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes every expired entry and returns how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut inner = self.inner.write().await;

        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, stored)| stored.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.drop_key(key);
        }
        inner.stats.record_expirations(expired.len());
        expired.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey("key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(StoreError::InvalidKey(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = current_timestamp_ms();
        let mut inner = self.inner.write().await;

        let lookup = inner
            .entries
            .get(key)
            .map(|stored| (!stored.is_expired(now)).then(|| stored.value.clone()));

        match lookup {
            Some(Some(value)) => {
                inner.stats.record_hit();
                inner.lru.touch(key);
                Ok(Some(value))
            }
            Some(None) => {
                inner.drop_key(key);
                inner.stats.record_expirations(1);
                inner.stats.record_miss();
                Ok(None)
            }
            None => {
                inner.stats.record_miss();
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), StoreError> {
        validate_key(key)?;
        if ttl_secs == 0 {
            return Err(StoreError::InvalidTtl(format!(
                "expiry for '{}' must be at least one second",
                key
            )));
        }

        let mut inner = self.inner.write().await;

        let is_overwrite = inner.entries.contains_key(key);
        if !is_overwrite && inner.entries.len() >= inner.max_entries {
            match inner.lru.evict_oldest() {
                Some(evicted) => {
                    inner.entries.remove(&evicted);
                    inner.stats.record_eviction();
                }
                None => {
                    return Err(StoreError::Full(
                        "store is full and eviction failed".to_string(),
                    ));
                }
            }
        }

        let ttl_ms = i64::try_from(ttl_secs)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        let expires_at = current_timestamp_ms().saturating_add(ttl_ms);
        inner
            .entries
            .insert(key.to_string(), StoredValue { value, expires_at });
        inner.lru.touch(key);
        let count = inner.entries.len();
        inner.stats.set_total_entries(count);

        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool, StoreError> {
        let now = current_timestamp_ms();
        let mut inner = self.inner.write().await;

        let live = inner
            .entries
            .get(key)
            .is_some_and(|stored| !stored.is_expired(now));
        inner.drop_key(key);
        Ok(live)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let now = current_timestamp_ms();
        let inner = self.inner.read().await;

        let mut keys: Vec<String> = inner
            .entries
            .iter()
            .filter(|(key, stored)| !stored.is_expired(now) && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

// == Glob Matching ==
/// Redis-style glob with `*` (any run) and `?` (any single character).
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position of the last `*` seen and the text index it was matched against
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = backtrack {
            p = star_p + 1;
            t = star_t + 1;
            backtrack = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
