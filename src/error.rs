//! Error types for the market cache service
//!
//! Three layers: the durable store, the upstream provider, and the
//! application-level error that HTTP routes turn into JSON responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error ==
/// Failures raised by a [`crate::cache::KvStore`] implementation.
///
/// The cache-backed fetcher never surfaces these to its callers; they are
/// logged and treated as a miss (reads) or swallowed (writes).
#[derive(Error, Debug)]
pub enum StoreError {
    /// Key is empty or longer than the store accepts
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Expiry of zero seconds was requested
    #[error("Invalid expiry: {0}")]
    InvalidTtl(String),

    /// Store is at capacity and nothing could be evicted
    #[error("Store full: {0}")]
    Full(String),

    /// Backend could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// == Upstream Error ==
/// Failures talking to the market-data provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// Provider answered 429
    #[error("CoinGecko API rate limit exceeded (429): {body}")]
    RateLimited { body: String },

    /// Any other non-2xx answer
    #[error("CoinGecko API error ({status}): {body}")]
    Status { status: u16, body: String },

    /// Connection, TLS or timeout failure
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// 2xx answer whose body was not the expected JSON
    #[error("Invalid upstream response: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// Classifies a non-2xx status and its body text.
    pub fn from_status(status: u16, body: String) -> Self {
        if status == 429 {
            UpstreamError::RateLimited { body }
        } else {
            UpstreamError::Status { status, body }
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, UpstreamError::RateLimited { .. })
    }
}

// == App Error ==
/// Unified error type for market-data operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Required configuration (the provider API key) is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider call failed
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Caller supplied unusable input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        RouteError::new("Request failed", self).into_response()
    }
}

// == Route Error ==
/// Error as seen at an HTTP route boundary.
///
/// Every failure maps to a 500 with an `{ error, message }` body; the
/// upstream status code is not forwarded.
#[derive(Debug)]
pub struct RouteError {
    context: &'static str,
    token_id: Option<String>,
    source: AppError,
}

impl RouteError {
    pub fn new(context: &'static str, source: AppError) -> Self {
        Self {
            context,
            token_id: None,
            source,
        }
    }

    /// Attaches the token id echoed back by the token route.
    pub fn with_token_id(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = Some(token_id.into());
        self
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.context.to_string(),
            message: self.source.to_string(),
            token_id: self.token_id,
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for market-data operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_429_is_rate_limited() {
        let err = UpstreamError::from_status(429, "slow down".to_string());
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_other_status_keeps_code_and_body() {
        let err = UpstreamError::from_status(503, "maintenance".to_string());
        assert_eq!(
            err,
            UpstreamError::Status {
                status: 503,
                body: "maintenance".to_string()
            }
        );
        assert_eq!(err.to_string(), "CoinGecko API error (503): maintenance");
    }

    #[test]
    fn test_route_error_is_500() {
        let err = RouteError::new(
            "Failed to fetch market data",
            AppError::Configuration("COINGECKO_API_KEY is not set".to_string()),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
