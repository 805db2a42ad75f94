//! Handler for `GET /videos/{filename}`.
//!
//! Streams a stored video from disk with HTTP range request support. Any
//! caller may fetch any stored file by name.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{self, HeaderMap};
use axum::http::StatusCode;
use axum::response::Response;
use soragen_core::storage::content_type_for_extension;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Largest range served when the client leaves the end open (1 MiB).
const MAX_CHUNK_SIZE: u64 = 1024 * 1024;

/// Parse a `Range: bytes=START-END` header value.
/// Returns `(start, optional_end)`.
fn parse_range_header(range: &str) -> Option<(u64, Option<u64>)> {
    let range = range.strip_prefix("bytes=")?;
    let (start, end) = range.split_once('-')?;
    let start = start.trim().parse::<u64>().ok()?;
    let end = match end.trim() {
        "" => None,
        e => Some(e.parse::<u64>().ok()?),
    };
    Some((start, end))
}

/// Resolve a parsed range against the file size.
///
/// Returns the inclusive `(start, end)` to serve, or `None` when the range
/// cannot be satisfied.
fn resolve_range(start: u64, end: Option<u64>, file_size: u64) -> Option<(u64, u64)> {
    if file_size == 0 || start >= file_size {
        return None;
    }
    let last = file_size - 1;
    let end = end
        .map(|e| e.min(last))
        .unwrap_or_else(|| start.saturating_add(MAX_CHUNK_SIZE - 1).min(last));
    (start <= end).then_some((start, end))
}

fn io_error(e: std::io::Error) -> AppError {
    AppError::ServeError(e.to_string())
}

fn build_error(e: axum::http::Error) -> AppError {
    AppError::ServeError(e.to_string())
}

/// GET /videos/{filename}
///
/// 404 when the file does not exist (or the name is not a plain file
/// name). With a satisfiable `Range` header the response is `206` with
/// the requested slice; otherwise the whole file is streamed.
pub async fn serve_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let path = state.store.locate(&filename).await?;

    let file_size = tokio::fs::metadata(&path).await.map_err(io_error)?.len();
    let content_type = content_type_for_extension(&filename);
    let disposition = format!("attachment; filename=\"{filename}\"");

    if let Some(range_value) = headers.get(header::RANGE) {
        let range_str = range_value
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid Range header".into()))?;

        if let Some((start, end)) = parse_range_header(range_str) {
            let Some((start, end)) = resolve_range(start, end, file_size) else {
                return Response::builder()
                    .status(StatusCode::RANGE_NOT_SATISFIABLE)
                    .header(header::CONTENT_RANGE, format!("bytes */{file_size}"))
                    .body(Body::empty())
                    .map_err(build_error);
            };

            let length = end - start + 1;

            let mut file = tokio::fs::File::open(&path).await.map_err(io_error)?;
            file.seek(std::io::SeekFrom::Start(start))
                .await
                .map_err(io_error)?;

            let stream = ReaderStream::new(file.take(length));

            return Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, length.to_string())
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {start}-{end}/{file_size}"),
                )
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_DISPOSITION, disposition)
                .body(Body::from_stream(stream))
                .map_err(build_error);
        }
    }

    // No usable Range header, serve the full file.
    let file = tokio::fs::File::open(&path).await.map_err(io_error)?;
    let stream = ReaderStream::new(file);

    tracing::debug!(filename = %filename, bytes = file_size, "Serving video");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, file_size.to_string())
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(stream))
        .map_err(build_error)
}
