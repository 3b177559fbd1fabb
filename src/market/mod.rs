//! Market Module
//!
//! Provider-specific query builders, endpoint TTLs and response reshaping.

mod client;
mod metrics;
mod summary;

pub use client::{MarketClient, MarketsQuery, PriceOptions, CACHE_TAG};
pub use metrics::{calculate_market_metrics, MarketMetrics, Performer};
pub use summary::TokenSummary;

/// Durable cache TTLs per endpoint, in seconds.
pub mod ttl {
    pub const TRENDING: u64 = 300;
    pub const SEARCH: u64 = 300;
    pub const PRICE: u64 = 60;
    pub const TOKEN_DATA: u64 = 600;
    pub const MARKETS: u64 = 120;
    pub const CHART: u64 = 300;
}
