//! Cache Module
//!
//! Durable key-value storage and the cache-backed fetcher built on it.

mod entry;
mod fetcher;
mod key;
mod lru;
mod stats;
mod store;

#[cfg(test)]
pub(crate) mod testing;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use fetcher::CacheFetcher;
pub use key::{derive_key, QueryParams};
pub use lru::LruTracker;
pub use stats::{FetcherStats, StoreStats};
pub use store::{glob_match, KvStore, MemoryKvStore};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
