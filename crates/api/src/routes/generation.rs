//! Route definitions for video generation.
//!
//! Mounted under `/api`.
//!
//! ```text
//! POST /generate-video        generate_video
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/generate-video", post(generation::generate_video))
}
