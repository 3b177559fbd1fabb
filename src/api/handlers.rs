//! API Handlers
//!
//! HTTP request handlers for the market-data routes.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::error;

use crate::cache::{CacheFetcher, KvStore, MemoryKvStore};
use crate::config::Config;
use crate::error::{AppError, RouteError};
use crate::gate::{HttpTransport, RateLimiter, ReqwestTransport, RequestGate, ResponseCache};
use crate::market::{calculate_market_metrics, ttl, MarketClient, TokenSummary};
use crate::models::{
    cache_control, HealthResponse, InvalidateResponse, MarketDataParams, MarketDataResponse,
    StatsResponse, TokenParams,
};

/// Application state shared across all handlers.
///
/// One store, fetcher, gate and client per process; every handler clones
/// the `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryKvStore>,
    pub fetcher: Arc<CacheFetcher>,
    pub gate: Arc<RequestGate>,
    pub client: Arc<MarketClient>,
}

impl AppState {
    /// Wires the components from configuration using the given transport.
    pub fn with_transport(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        let store = Arc::new(MemoryKvStore::new(config.max_entries));
        let durable: Arc<dyn KvStore> = store.clone();
        let fetcher = Arc::new(CacheFetcher::new(durable));
        let gate = Arc::new(RequestGate::new(
            transport,
            RateLimiter::new(config.min_interval()),
            ResponseCache::new(config.memory_cache_capacity, config.memory_ttl()),
        ));
        let client = Arc::new(MarketClient::new(
            config.base_url.clone(),
            config.api_key.clone(),
            fetcher.clone(),
            gate.clone(),
        ));

        Self {
            store,
            fetcher,
            gate,
            client,
        }
    }

    /// Wires the components from configuration with a real HTTP client.
    pub fn from_config(config: &Config) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }
}

/// Handler for GET /api/market/data
pub async fn market_data_handler(
    State(state): State<AppState>,
    Query(params): Query<MarketDataParams>,
) -> Result<impl IntoResponse, RouteError> {
    let query = params.into_query();

    let data = state.client.get_markets(&query).await.map_err(|e| {
        error!(error = %e, "Error fetching market data");
        RouteError::new("Failed to fetch market data", e)
    })?;

    let metrics = calculate_market_metrics(&data);
    let body = MarketDataResponse::new(data, metrics, query);

    Ok((
        [(header::CACHE_CONTROL, cache_control(ttl::MARKETS, ttl::MARKETS * 2))],
        Json(body),
    ))
}

/// Handler for GET /api/token/:id
///
/// Detail and chart are requested concurrently; both still pass through
/// the shared cooldown, so a cold fetch waits one interval for the second.
pub async fn token_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<TokenParams>,
) -> Result<impl IntoResponse, RouteError> {
    let days = params.days();

    let fetched = tokio::try_join!(
        state.client.get_token_data(&id),
        state.client.get_market_chart(&id, days)
    );
    let (token, chart) = fetched.map_err(|e| {
        error!(token_id = %id, error = %e, "Error fetching token data");
        RouteError::new("Failed to fetch token data", e).with_token_id(id.clone())
    })?;

    let summary = TokenSummary::from_upstream(&token, &chart, days);

    Ok((
        [(header::CACHE_CONTROL, cache_control(ttl::CHART, ttl::CHART * 2))],
        Json(summary),
    ))
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        fetcher: state.fetcher.stats(),
        store: state.store.stats().await,
        memory_entries: state.gate.memory_len(),
        indexed_keys: state.fetcher.indexed_len().await,
    })
}

/// Handler for DELETE /api/cache/tag/:tag
pub async fn invalidate_tag_handler(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Json<InvalidateResponse>, AppError> {
    if tag.trim().is_empty() {
        return Err(AppError::InvalidRequest("tag cannot be empty".to_string()));
    }

    let removed = state.fetcher.invalidate_by_tag(&tag).await;
    Ok(Json(InvalidateResponse { tag, removed }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
