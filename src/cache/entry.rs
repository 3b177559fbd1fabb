//! Cache Entry Module
//!
//! Envelope written to the durable store by the cache-backed fetcher.

use chrono::Utc;
use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached value together with its write time and optional tag.
///
/// `timestamp` and `tag` are fixed when the entry is written; a refresh
/// replaces the whole entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Write time (Unix milliseconds)
    pub timestamp: i64,
    /// Label used for bulk invalidation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Wraps `data`, stamping it with the current time.
    pub fn new(data: T, tag: Option<String>) -> Self {
        Self {
            data,
            timestamp: current_timestamp_ms(),
            tag,
        }
    }

    // == Age ==
    /// Age of the entry in seconds at `now_ms`.
    ///
    /// Clock skew that puts the write in the future yields an age of zero.
    pub fn age_secs(&self, now_ms: i64) -> f64 {
        (now_ms - self.timestamp).max(0) as f64 / 1000.0
    }

    // == Is Fresh ==
    /// An entry is fresh while its age is strictly below `ttl_secs`.
    pub fn is_fresh(&self, ttl_secs: u64, now_ms: i64) -> bool {
        self.age_secs(now_ms) < ttl_secs as f64
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
