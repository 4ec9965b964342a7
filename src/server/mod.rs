//! HTTP server.
//!
//! Provides one endpoint:
//! - `POST /certs` - describes the certificate chain of `{"domain": "https://..."}`
//! - `OPTIONS /certs` - CORS preflight
//!
//! Every response, including extractor rejections, carries permissive CORS
//! headers.

mod handlers;
mod types;


use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::post;
use axum::Router;

use crate::config::{Config, MAX_REQUEST_BODY_SIZE};
use crate::tls::ChainFetcher;

use handlers::{add_cors_headers, certs_handler, preflight_handler};
pub use handlers::status_for;
pub use types::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/certs", post(certs_handler).options(preflight_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE))
        .layer(middleware::map_response(add_cors_headers))
        .with_state(state)
}

/// Serves the router on `config.bind_address:config.port` until Ctrl-C.
pub async fn start_server(config: &Config) -> anyhow::Result<()> {
    let fetcher = ChainFetcher::new(config).context("Failed to initialize TLS client")?;
    let state = AppState {
        fetcher: Arc::new(fetcher),
        allow_private_hosts: config.allow_private_hosts,
    };

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind server to {addr}"))?;

    log::info!("Listening on http://{}/", listener.local_addr()?);
    log::info!("  - Describe: POST http://{addr}/certs");
    if config.allow_private_hosts {
        log::warn!("Private and loopback targets are allowed");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
