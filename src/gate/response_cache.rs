//! Response Cache
//!
//! Short-lived, bounded, in-process cache of upstream JSON keyed by URL.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use crate::cache::LruTracker;

#[derive(Debug)]
struct Cached {
    data: Value,
    stored_at: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Cached>,
    lru: LruTracker,
}

impl Inner {
    fn remove(&mut self, url: &str) {
        self.entries.remove(url);
        self.lru.remove(url);
    }
}

// == Response Cache ==
/// URL → response map with a fixed TTL and least-recently-used eviction
/// once `capacity` entries are held.
#[derive(Debug)]
pub struct ResponseCache {
    inner: Mutex<Inner>,
    capacity: usize,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // == Get ==
    /// Returns the cached response if it is younger than the TTL.
    pub fn get(&self, url: &str) -> Option<Value> {
        let mut inner = self.lock();

        let fresh = inner
            .entries
            .get(url)
            .map(|cached| (cached.stored_at.elapsed() < self.ttl).then(|| cached.data.clone()));

        match fresh {
            Some(Some(data)) => {
                inner.lru.touch(url);
                Some(data)
            }
            Some(None) => {
                inner.remove(url);
                None
            }
            None => None,
        }
    }

    // == Insert ==
    pub fn insert(&self, url: &str, data: Value) {
        let mut inner = self.lock();

        if !inner.entries.contains_key(url) && inner.entries.len() >= self.capacity {
            if let Some(oldest) = inner.lru.evict_oldest() {
                inner.entries.remove(&oldest);
            }
        }

        inner.entries.insert(
            url.to_string(),
            Cached {
                data,
                stored_at: Instant::now(),
            },
        );
        inner.lru.touch(url);
    }

    // == Sweep ==
    /// Drops every entry older than the TTL and returns how many went.
    pub fn sweep_expired(&self) -> usize {
        let mut inner = self.lock();

        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, cached)| cached.stored_at.elapsed() >= self.ttl)
            .map(|(url, _)| url.clone())
            .collect();

        for url in &expired {
            inner.remove(url);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
