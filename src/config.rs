//! Configuration Module
//!
//! Loads service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default upstream base URL
pub const DEFAULT_BASE_URL: &str = "https://pro-api.coingecko.com/api/v3";

/// Service configuration parameters.
///
/// Everything except the API key has a default. A missing key is not a
/// startup error; it fails the first request that needs the provider.
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider API key (`COINGECKO_API_KEY`)
    pub api_key: Option<String>,
    /// Provider base URL
    pub base_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of entries in the durable store
    pub max_entries: usize,
    /// Maximum number of URLs held by the gate's memory cache
    pub memory_cache_capacity: usize,
    /// Memory cache TTL in seconds
    pub memory_cache_ttl: u64,
    /// Minimum seconds between upstream calls
    pub rate_limit_interval: u64,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a Config from environment variables.
    ///
    /// # Environment Variables
    /// - `COINGECKO_API_KEY` - Provider API key (no default)
    /// - `COINGECKO_BASE_URL` - Provider base URL (default: pro API v3)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MAX_ENTRIES` - Durable store capacity (default: 10000)
    /// - `MEMORY_CACHE_CAPACITY` - Memory cache capacity (default: 512)
    /// - `MEMORY_CACHE_TTL` - Memory cache TTL in seconds (default: 60)
    /// - `RATE_LIMIT_INTERVAL` - Seconds between upstream calls (default: 15)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_key: env::var("COINGECKO_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            base_url: env::var("COINGECKO_BASE_URL").unwrap_or(defaults.base_url),
            server_port: parse_env("SERVER_PORT", defaults.server_port),
            max_entries: parse_env("MAX_ENTRIES", defaults.max_entries),
            memory_cache_capacity: parse_env(
                "MEMORY_CACHE_CAPACITY",
                defaults.memory_cache_capacity,
            ),
            memory_cache_ttl: parse_env("MEMORY_CACHE_TTL", defaults.memory_cache_ttl),
            rate_limit_interval: parse_env("RATE_LIMIT_INTERVAL", defaults.rate_limit_interval),
            cleanup_interval: parse_env("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    pub fn memory_ttl(&self) -> Duration {
        Duration::from_secs(self.memory_cache_ttl)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_interval)
    }
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            server_port: 3000,
            max_entries: 10_000,
            memory_cache_capacity: 512,
            memory_cache_ttl: 60,
            rate_limit_interval: 15,
            cleanup_interval: 30,
        }
    }
}
