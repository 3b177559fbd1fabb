//! Request Gate
//!
//! Memory cache + global cooldown in front of the upstream transport.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use crate::error::UpstreamError;
use crate::gate::{HttpTransport, RateLimiter, ResponseCache};

// == Request Gate ==
/// Every outbound provider call goes through one gate.
///
/// A URL answered within the memory TTL is served from memory without
/// touching the limiter. Anything else waits for the shared cooldown,
/// is dispatched once, and on success is cached in memory. Failures are
/// returned as-is; the gate never retries.
pub struct RequestGate {
    transport: Arc<dyn HttpTransport>,
    limiter: RateLimiter,
    memory: ResponseCache,
}

impl RequestGate {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        limiter: RateLimiter,
        memory: ResponseCache,
    ) -> Self {
        Self {
            transport,
            limiter,
            memory,
        }
    }

    // == Guarded Fetch ==
    pub async fn guarded_fetch(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<Value, UpstreamError> {
        if let Some(data) = self.memory.get(url) {
            debug!(url, "Memory cache hit");
            return Ok(data);
        }

        self.limiter.acquire().await;

        let response = self.transport.get(url, headers).await.map_err(|e| {
            error!(url, error = %e, "API fetch error");
            e
        })?;

        if !response.is_success() {
            let err = UpstreamError::from_status(response.status, response.body);
            error!(url, error = %err, "API fetch error");
            return Err(err);
        }

        let data: Value = serde_json::from_str(&response.body)
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;

        self.memory.insert(url, data.clone());
        Ok(data)
    }

    /// Drops memory entries past their TTL.
    pub fn sweep_memory(&self) -> usize {
        self.memory.sweep_expired()
    }

    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }
}
