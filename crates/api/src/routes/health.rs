use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when a backend credential is missing.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the Q&A flow has its credential.
    pub completion_configured: bool,
    /// Whether the video flow has its credential.
    pub job_backend_configured: bool,
}

/// GET /health -- returns service status and credential presence.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let completion_configured = state.completion.is_some();
    let job_backend_configured = state.jobs.is_some();

    let status = if completion_configured && job_backend_configured {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        completion_configured,
        job_backend_configured,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
