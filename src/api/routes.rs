//! API Routes
//!
//! Configures the Axum router with the market-data endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, invalidate_tag_handler, market_data_handler, stats_handler, token_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/market/data` - Solana ecosystem market listing with metrics
/// - `GET /api/token/:id` - Token detail with price chart
/// - `GET /api/cache/stats` - Cache counters
/// - `DELETE /api/cache/tag/:tag` - Drop every cached response with a tag
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/market/data", get(market_data_handler))
        .route("/api/token/:id", get(token_handler))
        .route("/api/cache/stats", get(stats_handler))
        .route("/api/cache/tag/:tag", delete(invalidate_tag_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
