//! Test store that records writes and can be told to fail.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::cache::{KvStore, MemoryKvStore};
use crate::error::StoreError;

/// [`MemoryKvStore`] wrapper recording every `set` as `(key, ttl_secs)`.
pub(crate) struct RecordingStore {
    inner: MemoryKvStore,
    fail_get: bool,
    fail_set: bool,
    sets: Mutex<Vec<(String, u64)>>,
}

impl RecordingStore {
    pub(crate) fn new(max_entries: usize) -> Self {
        Self {
            inner: MemoryKvStore::new(max_entries),
            fail_get: false,
            fail_set: false,
            sets: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_reads() -> Self {
        Self {
            fail_get: true,
            ..Self::new(100)
        }
    }

    pub(crate) fn failing_writes() -> Self {
        Self {
            fail_set: true,
            ..Self::new(100)
        }
    }

    /// Every attempted write, failed ones included.
    pub(crate) fn sets(&self) -> Vec<(String, u64)> {
        self.sets.lock().unwrap().clone()
    }
}

#[async_trait]
impl KvStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_get {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), StoreError> {
        self.sets.lock().unwrap().push((key.to_string(), ttl_secs));
        if self.fail_set {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.set(key, value, ttl_secs).await
    }

    async fn del(&self, key: &str) -> Result<bool, StoreError> {
        self.inner.del(key).await
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        self.inner.keys(pattern).await
    }
}
