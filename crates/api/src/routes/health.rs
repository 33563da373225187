use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the link-finder client passed its readiness probe.
    pub link_finder_ready: bool,
    /// Whether the compressor client passed its readiness probe.
    pub compressor_ready: bool,
}

/// GET /health -- returns service and worker-client health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let link_finder_ready = state.link_finder.is_ready();
    let compressor_ready = state.compressor.is_ready();

    let status = if link_finder_ready && compressor_ready {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        link_finder_ready,
        compressor_ready,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
