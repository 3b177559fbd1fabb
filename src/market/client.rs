//! Market-data client
//!
//! Thin query builders over the cache-backed fetcher and the request gate.

use std::sync::Arc;

use reqwest::Url;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use crate::cache::{derive_key, CacheFetcher, QueryParams};
use crate::error::{AppError, Result, UpstreamError};
use crate::gate::RequestGate;
use crate::market::ttl;

/// Tag attached to every provider response in the durable cache.
pub const CACHE_TAG: &str = "coingecko";

const KEY_NAMESPACE: &str = "coingecko";
const API_KEY_HEADER: &str = "x-cg-pro-api-key";

// == Query Types ==
/// Parameters of the `/coins/markets` listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketsQuery {
    pub vs_currency: String,
    pub category: String,
    pub order: String,
    pub per_page: u32,
    pub page: u32,
    pub sparkline: bool,
    pub price_change_percentage: String,
}

impl Default for MarketsQuery {
    fn default() -> Self {
        Self {
            vs_currency: "usd".to_string(),
            category: "solana-ecosystem".to_string(),
            order: "market_cap_desc".to_string(),
            per_page: 50,
            page: 1,
            sparkline: true,
            price_change_percentage: "24h".to_string(),
        }
    }
}

/// Optional extra columns for `/simple/price`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceOptions {
    pub include_market_cap: Option<bool>,
    pub include_24hr_vol: Option<bool>,
    pub include_24hr_change: Option<bool>,
}

// == Market Client ==
pub struct MarketClient {
    base_url: String,
    api_key: Option<String>,
    fetcher: Arc<CacheFetcher>,
    gate: Arc<RequestGate>,
}

impl MarketClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        fetcher: Arc<CacheFetcher>,
        gate: Arc<RequestGate>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.is_empty()),
            fetcher,
            gate,
        }
    }

    // == Cached Request ==
    /// Durable cache first, then the gate, for one provider endpoint.
    async fn cached_request<T>(
        &self,
        endpoint: &str,
        params: QueryParams,
        ttl_secs: u64,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration("COINGECKO_API_KEY is not set in environment variables".to_string())
        })?;

        let url = self.build_url(endpoint, &params)?;
        let key = derive_key(&format!("{}:{}", KEY_NAMESPACE, endpoint), &params);
        let headers = vec![
            ("accept".to_string(), "application/json".to_string()),
            (API_KEY_HEADER.to_string(), api_key.to_string()),
        ];
        let gate = &self.gate;

        self.fetcher
            .fetch_or_compute(
                &key,
                move || async move {
                    let data = gate.guarded_fetch(url.as_str(), &headers).await?;
                    serde_json::from_value(data)
                        .map_err(|e| AppError::from(UpstreamError::Decode(e.to_string())))
                },
                ttl_secs,
                Some(CACHE_TAG),
            )
            .await
    }

    fn build_url(&self, endpoint: &str, params: &QueryParams) -> Result<Url> {
        let base = format!("{}{}", self.base_url, endpoint);
        let url = if params.is_empty() {
            Url::parse(&base)
        } else {
            Url::parse_with_params(&base, params.pairs())
        };
        url.map_err(|e| AppError::Internal(format!("invalid upstream URL '{}': {}", base, e)))
    }

    // == Endpoints ==
    pub async fn get_trending_tokens(&self) -> Result<Value> {
        self.cached_request("/search/trending", QueryParams::new(), ttl::TRENDING)
            .await
    }

    pub async fn search_tokens(&self, query: &str) -> Result<Value> {
        let params = QueryParams::new().push("query", query);
        self.cached_request("/search", params, ttl::SEARCH).await
    }

    /// Spot prices for `ids`. An empty id list answers `{}` without any call.
    pub async fn get_token_prices(
        &self,
        ids: &[&str],
        vs_currencies: &[&str],
        options: PriceOptions,
    ) -> Result<Value> {
        if ids.is_empty() {
            return Ok(json!({}));
        }
        let vs_currencies = if vs_currencies.is_empty() {
            "usd".to_string()
        } else {
            vs_currencies.join(",")
        };

        let params = QueryParams::new()
            .push("ids", ids.join(","))
            .push("vs_currencies", vs_currencies)
            .push_opt("include_market_cap", options.include_market_cap)
            .push_opt("include_24hr_vol", options.include_24hr_vol)
            .push_opt("include_24hr_change", options.include_24hr_change);

        self.cached_request("/simple/price", params, ttl::PRICE).await
    }

    pub async fn get_token_data(&self, id: &str) -> Result<Value> {
        validate_id(id)?;
        let params = QueryParams::new()
            .push("localization", false)
            .push("tickers", false)
            .push("market_data", true)
            .push("community_data", true)
            .push("developer_data", false);

        self.cached_request(&format!("/coins/{}", id), params, ttl::TOKEN_DATA)
            .await
    }

    pub async fn get_markets(&self, query: &MarketsQuery) -> Result<Vec<Value>> {
        let params = QueryParams::new()
            .push("vs_currency", &query.vs_currency)
            .push("category", &query.category)
            .push("order", &query.order)
            .push("per_page", query.per_page)
            .push("page", query.page)
            .push("sparkline", query.sparkline)
            .push("price_change_percentage", &query.price_change_percentage);

        self.cached_request("/coins/markets", params, ttl::MARKETS).await
    }

    pub async fn get_market_chart(&self, id: &str, days: u32) -> Result<Value> {
        validate_id(id)?;
        let params = QueryParams::new().push("vs_currency", "usd").push("days", days);

        self.cached_request(&format!("/coins/{}/market_chart", id), params, ttl::CHART)
            .await
    }
}

/// Coin ids are interpolated into the path.
fn validate_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidRequest(format!("invalid token id '{}'", id)))
    }
}
