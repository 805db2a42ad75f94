pub mod generation;
pub mod health;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /health                 GET   service status, credential configured
/// /generate-video         POST  generate a video and store it locally
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(generation::router())
}
