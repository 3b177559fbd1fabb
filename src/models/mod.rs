//! Request and Response models for the HTTP surface
//!
//! DTOs for query strings and JSON bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{MarketDataParams, TokenParams};
pub use responses::{
    cache_control, ErrorResponse, HealthResponse, InvalidateResponse, MarketDataResponse,
    StatsResponse,
};
