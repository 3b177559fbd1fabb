//! Response DTOs for the HTTP surface
//!
//! Defines the JSON bodies and cache headers the routes emit.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{FetcherStats, StoreStats};
use crate::market::{MarketMetrics, MarketsQuery};

/// `Cache-Control` value for a shared cache.
///
/// Keep `s_maxage` equal to the TTL of the data the route serves.
pub fn cache_control(s_maxage: u64, stale_while_revalidate: u64) -> String {
    format!(
        "public, s-maxage={}, stale-while-revalidate={}",
        s_maxage, stale_while_revalidate
    )
}

/// Body of `GET /api/market/data`
#[derive(Debug, Clone, Serialize)]
pub struct MarketDataResponse {
    pub data: Vec<Value>,
    pub metrics: MarketMetrics,
    pub params: MarketsQuery,
    /// ISO 8601 response time
    pub timestamp: String,
    pub source: &'static str,
}

impl MarketDataResponse {
    pub fn new(data: Vec<Value>, metrics: MarketMetrics, params: MarketsQuery) -> Self {
        Self {
            data,
            metrics,
            params,
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: "CoinGecko Pro API",
        }
    }
}

/// Body of `GET /api/cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub fetcher: FetcherStats,
    pub store: StoreStats,
    /// Responses currently held by the gate's memory cache
    pub memory_entries: usize,
    /// Keys tracked for tag invalidation
    pub indexed_keys: usize,
}

/// Body of `DELETE /api/cache/tag/:tag`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub tag: String,
    pub removed: usize,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error body for every failed route
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// What the route was trying to do
    pub error: String,
    /// Underlying failure
    pub message: String,
    #[serde(rename = "tokenId", skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
}
