//! HTTP surface: `GET /api/exchange-rate`.

use crate::core::response::{ErrorResponse, RateResponse};
use crate::core::service::RateService;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};

pub const EXCHANGE_RATE_PATH: &str = "/api/exchange-rate";

pub fn router(service: Arc<RateService>) -> Router {
    // The converter widget may be served from a different origin.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route(EXCHANGE_RATE_PATH, get(exchange_rate))
        .with_state(service)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
}

async fn exchange_rate(State(service): State<Arc<RateService>>) -> Response {
    match service.get_rate().await {
        Ok(outcome) => Json(RateResponse::from(outcome)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::from(&e)),
        )
            .into_response(),
    }
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(service: Arc<RateService>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    serve_on(listener, service, shutdown_signal()).await
}

pub async fn serve_on<F>(
    listener: TcpListener,
    service: Arc<RateService>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr()?;
    info!("Listening on http://{local_addr}{EXCHANGE_RATE_PATH}");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
