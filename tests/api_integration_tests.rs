//! Integration Tests for API Endpoints
//!
//! Full request/response cycle through the router with a stub upstream.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use market_cache::{
    api::create_router,
    cache::KvStore,
    error::UpstreamError,
    gate::{HttpResponse, HttpTransport},
    AppState, Config,
};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Stub Upstream ==

/// Answers by URL path and counts every dispatch.
struct StubUpstream {
    status: u16,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl StubUpstream {
    fn new(status: u16) -> Arc<Self> {
        Arc::new(Self {
            status,
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn body_for(url: &str) -> Value {
        if url.contains("/coins/markets") {
            json!([
                {"id": "solana", "symbol": "sol", "name": "Solana", "current_price": 150.0,
                 "market_cap": 7.0e10, "total_volume": 3.0e9, "price_change_percentage_24h": 2.5},
                {"id": "bonk", "symbol": "bonk", "name": "Bonk", "current_price": 0.00002,
                 "market_cap": 1.0e9, "total_volume": 1.0e8, "price_change_percentage_24h": -4.0}
            ])
        } else if url.contains("/market_chart") {
            json!({"prices": [[1, 149.0], [2, 150.0]], "market_caps": [], "total_volumes": []})
        } else if url.contains("/coins/") {
            json!({
                "id": "solana", "name": "Solana", "symbol": "sol",
                "market_data": {"current_price": {"usd": 150.0}},
                "last_updated": "2026-10-18T00:00:00.000Z"
            })
        } else {
            json!({})
        }
    }
}

#[async_trait]
impl HttpTransport for StubUpstream {
    async fn get(
        &self,
        url: &str,
        _headers: &[(String, String)],
    ) -> Result<HttpResponse, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());

        let body = if self.status == 200 {
            Self::body_for(url).to_string()
        } else {
            "Too Many Requests".to_string()
        };
        Ok(HttpResponse {
            status: self.status,
            body,
        })
    }
}

// == Helper Functions ==

fn test_config(api_key: Option<&str>) -> Config {
    Config {
        api_key: api_key.map(str::to_string),
        rate_limit_interval: 0,
        ..Config::default()
    }
}

fn create_test_app(upstream: Arc<StubUpstream>, api_key: Option<&str>) -> (Router, AppState) {
    let state = AppState::with_transport(&test_config(api_key), upstream);
    (create_router(state.clone()), state)
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// == Market Data Endpoint ==

#[tokio::test]
async fn test_market_data_success() {
    let upstream = StubUpstream::new(200);
    let (app, _) = create_test_app(upstream.clone(), Some("test-key"));

    let response = get(&app, "/api/market/data?per_page=2&page=1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, s-maxage=120, stale-while-revalidate=240"
    );

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["metrics"]["total_market_cap"], 7.1e10);
    assert_eq!(json["metrics"]["positive_performers_24h"], 1);
    assert_eq!(json["metrics"]["best_performer"]["symbol"], "sol");
    assert_eq!(json["metrics"]["worst_performer"]["symbol"], "bonk");
    assert_eq!(json["params"]["per_page"], 2);
    assert_eq!(json["params"]["vs_currency"], "usd");
    assert_eq!(json["source"], "CoinGecko Pro API");
}

#[tokio::test]
async fn test_market_data_second_request_uses_cache() {
    let upstream = StubUpstream::new(200);
    let (app, _) = create_test_app(upstream.clone(), Some("test-key"));

    let first = body_to_json(get(&app, "/api/market/data?per_page=2&page=1").await.into_body()).await;
    // Same parameters in a different order
    let second = body_to_json(get(&app, "/api/market/data?page=1&per_page=2").await.into_body()).await;

    assert_eq!(first["data"], second["data"]);
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_market_data_upstream_429() {
    let upstream = StubUpstream::new(429);
    let (app, state) = create_test_app(upstream.clone(), Some("test-key"));

    let response = get(&app, "/api/market/data").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Failed to fetch market data");
    assert!(json["message"].as_str().unwrap().contains("429"));

    // Nothing was cached, so the next request goes upstream again
    assert!(state.store.keys("*").await.unwrap().is_empty());
    get(&app, "/api/market/data").await;
    assert_eq!(upstream.calls(), 2);
}

#[tokio::test]
async fn test_market_data_missing_api_key() {
    let upstream = StubUpstream::new(200);
    let (app, _) = create_test_app(upstream.clone(), None);

    let response = get(&app, "/api/market/data").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("COINGECKO_API_KEY"));
    assert_eq!(upstream.calls(), 0);
}

// == Token Endpoint ==

#[tokio::test]
async fn test_token_success() {
    let upstream = StubUpstream::new(200);
    let (app, _) = create_test_app(upstream.clone(), Some("test-key"));

    let response = get(&app, "/api/token/solana?days=30").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, s-maxage=300, stale-while-revalidate=600"
    );

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["id"], "solana");
    assert_eq!(json["symbol"], "SOL");
    assert_eq!(json["market_data"]["current_price"], 150.0);
    assert_eq!(json["chart_data"]["timeframe"], "30 days");
    assert_eq!(json["chart_data"]["prices"], json!([[1, 149.0], [2, 150.0]]));
    assert_eq!(json["ecosystem"], "solana");
    assert_eq!(upstream.calls(), 2);

    let urls = upstream.urls.lock().unwrap().clone();
    assert!(urls.iter().any(|u| u.contains("/coins/solana/market_chart?vs_currency=usd&days=30")));
}

#[tokio::test]
async fn test_token_failure_echoes_id() {
    let upstream = StubUpstream::new(429);
    let (app, _) = create_test_app(upstream, Some("test-key"));

    let response = get(&app, "/api/token/bonk").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Failed to fetch token data");
    assert_eq!(json["tokenId"], "bonk");
}

// == Cache Management Endpoints ==

#[tokio::test]
async fn test_invalidate_tag_clears_durable_cache() {
    let upstream = StubUpstream::new(200);
    let (app, state) = create_test_app(upstream.clone(), Some("test-key"));

    get(&app, "/api/market/data").await;
    assert_eq!(state.store.len().await, 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/cache/tag/coingecko")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 1);
    assert!(state.store.is_empty().await);

    // The durable copy is gone but the gate's memory copy still answers
    get(&app, "/api/market/data").await;
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_stats_endpoint() {
    let upstream = StubUpstream::new(200);
    let (app, _) = create_test_app(upstream, Some("test-key"));

    get(&app, "/api/market/data").await;
    get(&app, "/api/market/data").await;

    let response = get(&app, "/api/cache/stats").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["fetcher"]["hits"], 1);
    assert_eq!(json["fetcher"]["misses"], 1);
    assert_eq!(json["store"]["total_entries"], 1);
    assert_eq!(json["memory_entries"], 1);
    assert_eq!(json["indexed_keys"], 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app(StubUpstream::new(200), None);

    let response = get(&app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
