use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use soragen_core::error::CoreError;
use soragen_openai::error::VideoGenError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`VideoGenError`] and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{"detail": ..., "code": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `soragen_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure anywhere in the submit/poll/download pipeline.
    #[error(transparent)]
    Generation(#[from] VideoGenError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// A stored video exists but could not be read or streamed.
    #[error("Serve error: {0}")]
    ServeError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Generation(err) => classify_generation_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                format!("Error generating video: {msg}"),
            ),
            AppError::ServeError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SERVE_ERROR",
                format!("Error serving video: {msg}"),
            ),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), code, error = %message, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), code, error = %message, "Request rejected");
        }

        let body = json!({
            "detail": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a core error to status, code, and message.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} not found"),
        ),
        CoreError::Configuration(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "CONFIGURATION_ERROR",
            msg.clone(),
        ),
        CoreError::Internal(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            msg.clone(),
        ),
    }
}

/// Map a pipeline error to status, code, and message.
///
/// - Upstream status errors keep the upstream status; anything that is
///   not a 4xx/5xx becomes 502.
/// - A failed job is 500, a timeout is 408.
/// - Transport and I/O errors are unexpected and reported as 500 with
///   their text.
fn classify_generation_error(err: &VideoGenError) -> (StatusCode, &'static str, String) {
    match err {
        VideoGenError::Core(core) => classify_core_error(core),
        VideoGenError::Upstream { status, message } => {
            let status = StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            (status, "UPSTREAM_ERROR", message.clone())
        }
        VideoGenError::JobFailed(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "GENERATION_FAILED",
            err.to_string(),
        ),
        VideoGenError::Timeout { .. } => {
            (StatusCode::REQUEST_TIMEOUT, "TIMEOUT", err.to_string())
        }
        VideoGenError::Request(_) | VideoGenError::Io(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            format!("Error generating video: {err}"),
        ),
    }
}
