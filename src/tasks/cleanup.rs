//! Cache Sweep Task
//!
//! Background task that periodically drops expired entries from the
//! durable store and the gate's memory cache, then prunes the tag index.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheFetcher, MemoryKvStore};
use crate::gate::RequestGate;

/// Spawns the sweep loop.
///
/// Both caches already ignore stale entries on read; the sweep only
/// bounds memory held by entries nobody asks for again. The returned
/// handle is aborted on shutdown.
pub fn spawn_cleanup_task(
    store: Arc<MemoryKvStore>,
    fetcher: Arc<CacheFetcher>,
    gate: Arc<RequestGate>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let expired = store.cleanup_expired().await;
            let swept = gate.sweep_memory();
            let unindexed = fetcher.prune_index().await;

            if expired > 0 || swept > 0 || unindexed > 0 {
                info!(expired, swept, unindexed, "Cache sweep removed stale entries");
            } else {
                debug!("Cache sweep: nothing to remove");
            }
        }
    })
}
