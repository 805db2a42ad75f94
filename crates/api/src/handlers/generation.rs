//! Handler for `POST /api/generate-video`.
//!
//! The submit → poll → download pipeline runs on its own task and the
//! request waits on it. Dropping the request future (client disconnect,
//! request timeout) does not stop the pipeline; the video still lands in
//! the store.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use soragen_core::generation::{GenerationRequest, GenerationResponse};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/generate-video
///
/// Returns the local URL of the stored video. Errors keep the taxonomy of
/// [`AppError`]: missing key 500, upstream errors with their status,
/// failed job 500, timeout 408.
pub async fn generate_video(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> AppResult<Json<GenerationResponse>> {
    tracing::info!(
        model = %request.model,
        size = %request.size,
        duration = request.duration,
        prompt_len = request.prompt.len(),
        "Video generation requested",
    );

    let generator = Arc::clone(&state.generator);
    let video = tokio::spawn(async move { generator.generate(&request).await })
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))??;

    Ok(Json(GenerationResponse::success(&video.filename)))
}
