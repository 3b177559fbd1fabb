//! Market Cache - caching and rate-limited access to a market-data provider
//!
//! Serves Solana ecosystem market data from a durable cache, refilling it
//! through a rate-limited gate in front of the provider API.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use market_cache::api::create_router;
use market_cache::{spawn_cleanup_task, AppState, Config};

/// Startup: tracing, configuration, shared state, sweep task, then the
/// HTTP server until SIGINT/SIGTERM.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "market_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Market Cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: base_url={}, max_entries={}, memory_cache={}x{}s, rate_limit={}s, port={}",
        config.base_url,
        config.max_entries,
        config.memory_cache_capacity,
        config.memory_cache_ttl,
        config.rate_limit_interval,
        config.server_port
    );
    if config.api_key.is_none() {
        warn!("COINGECKO_API_KEY is not set; market routes will fail until it is configured");
    }

    let state = AppState::from_config(&config);

    let cleanup_handle = spawn_cleanup_task(
        state.store.clone(),
        state.fetcher.clone(),
        state.gate.clone(),
        config.cleanup_interval,
    );

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then stops the sweep task.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
}
