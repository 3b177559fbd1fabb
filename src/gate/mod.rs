//! Rate-Limited Request Gate
//!
//! Spaces outbound calls to the market-data provider and keeps a
//! short-lived in-memory copy of each response.

mod rate_limiter;
mod request_gate;
mod response_cache;
mod transport;

pub use rate_limiter::RateLimiter;
pub use request_gate::RequestGate;
pub use response_cache::ResponseCache;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
