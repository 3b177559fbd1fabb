//! API Module
//!
//! HTTP handlers and routing for the market-data service.
//!
//! # Endpoints
//! - `GET /api/market/data` - Market listing with aggregate metrics
//! - `GET /api/token/:id` - Token detail with price chart
//! - `GET /api/cache/stats` - Cache counters
//! - `DELETE /api/cache/tag/:tag` - Tag invalidation
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
