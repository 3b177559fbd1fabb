//! Rate Limiter
//!
//! Minimum spacing between outbound calls, shared by everything that goes
//! through one [`crate::gate::RequestGate`].

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

// == Rate Limiter ==
/// Enforces a single global cooldown between dispatches.
///
/// Each caller reserves the next free slot under a short lock and then
/// sleeps outside it, so overlapping callers queue up one interval apart
/// instead of waking together.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    /// Dispatch time reserved by the most recent caller
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until the caller may dispatch and returns how long it waited.
    pub async fn acquire(&self) -> Duration {
        let slot = self.reserve();
        let wait = slot.saturating_duration_since(Instant::now());

        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "Rate limit cooldown");
            tokio::time::sleep_until(slot).await;
        }
        wait
    }

    fn reserve(&self) -> Instant {
        let mut last_call = self
            .last_call
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let now = Instant::now();
        let slot = match *last_call {
            Some(previous) => now.max(previous + self.min_interval),
            None => now,
        };
        *last_call = Some(slot);
        slot
    }
}
