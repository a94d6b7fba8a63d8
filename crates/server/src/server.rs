//! Router assembly and the HTTP adapter's entry point
//! (docs/ARCHITECTURE.md §6.1).
//!
//! No API-key gate, rate limiter, CORS, or response compression here:
//! nothing in this surface calls for tenant authentication or those
//! transport concerns, so the router stays to routes, request-id/logging
//! middleware, and a request timeout.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use engine::Manager;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{log_requests, request_id};
use crate::routes::{collections, documents, health, not_found};
use crate::state::AppState;

/// Assemble the router: routes, middleware stack, and shared state. Public
/// so integration tests (and embedders who want their own listener/TLS
/// setup) can drive the `Service` directly without binding a socket.
pub fn build_router(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .route("/healthcheck", get(health::healthcheck))
        .route(
            "/api/{collection}/documents",
            get(documents::query).post(documents::ingest),
        )
        .route(
            "/api/collections",
            get(collections::list_collections).post(collections::create_collection),
        )
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `listen` and serve the HTTP adapter until a shutdown signal
/// arrives. `timeout` bounds every request (the `timeout` configuration
/// option, reserved by the core itself, consumed here).
pub async fn run(listen: &str, timeout: Duration, manager: Arc<Manager>) -> anyhow::Result<()> {
    let state = AppState::new(manager);
    let app = build_router(state, timeout);

    let addr: SocketAddr = listen.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "lexdb HTTP adapter listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP adapter shut down");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
