//! Cache Statistics Module
//!
//! Counters for the memory store and the cache-backed fetcher.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Store Stats ==
/// Counters kept by [`crate::cache::MemoryKvStore`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Reads that found a live entry
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Entries dropped by LRU policy
    pub evictions: u64,
    /// Entries dropped because their expiry passed
    pub expirations: u64,
    /// Current number of stored entries
    pub total_entries: usize,
}

impl StoreStats {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Fetcher Stats ==
/// Snapshot of [`crate::cache::CacheFetcher`] outcomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FetcherStats {
    /// Served from a fresh durable entry
    pub hits: u64,
    /// No usable entry, producer invoked
    pub misses: u64,
    /// Subset of misses where an entry existed but was too old
    pub stale: u64,
    /// Store reads that failed and were treated as misses
    pub read_errors: u64,
    /// Store writes that failed after a successful producer call
    pub write_errors: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

/// Lock-free counters behind [`FetcherStats`].
#[derive(Debug, Default)]
pub(crate) struct FetcherCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    stale: AtomicU64,
    read_errors: AtomicU64,
    write_errors: AtomicU64,
}

impl FetcherCounters {
    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn stale(&self) {
        self.stale.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn read_error(&self) {
        self.read_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> FetcherStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        FetcherStats {
            hits,
            misses,
            stale: self.stale.load(Ordering::Relaxed),
            read_errors: self.read_errors.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            hit_rate: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
        }
    }
}
