use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Whether an upstream API key is configured.
    pub api_key_configured: bool,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// GET /api/health -- reports liveness and whether generation can work.
///
/// Never calls the upstream; a missing key only flips the flag.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        api_key_configured: state.generator.api().has_api_key(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
