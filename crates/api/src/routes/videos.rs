//! Route definitions for serving stored videos.
//!
//! Mounted at `/videos`. Files are addressed by name only.
//!
//! ```text
//! GET  /{filename}            serve_video
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/{filename}", get(videos::serve_video))
}
