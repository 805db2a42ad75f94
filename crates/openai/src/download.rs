//! Streamed download of finished videos.
//!
//! The content body is written to disk as it arrives, through a fixed
//! 8 KiB write buffer, so a large video never sits in memory whole. A
//! download that fails part-way removes its partial file.

use std::path::{Path, PathBuf};

use futures::{Stream, StreamExt};
use soragen_core::storage::VideoStore;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::api::VideoApiClient;
use crate::error::VideoGenError;

/// Write buffer size for video downloads (8 KiB).
pub const DOWNLOAD_CHUNK_SIZE: usize = 8 * 1024;

/// A video stored locally after a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedVideo {
    /// Upstream job ID.
    pub video_id: String,
    /// File name inside the store, e.g. `video_123.mp4`.
    pub filename: String,
    /// Full path of the stored file.
    pub path: PathBuf,
    /// Bytes written; equals the sum of all received chunk sizes.
    pub bytes_written: u64,
}

/// Download the content of a completed job into `store`.
pub async fn download_video(
    api: &VideoApiClient,
    store: &VideoStore,
    video_id: &str,
) -> Result<DownloadedVideo, VideoGenError> {
    let path = store.artifact_path(video_id)?;
    let response = api.open_content(video_id).await?;

    tracing::debug!(video_id, path = %path.display(), "Streaming video content to disk");

    let bytes_written = save_stream(response.bytes_stream(), &path).await?;

    tracing::info!(
        video_id,
        path = %path.display(),
        bytes = bytes_written,
        "Video saved",
    );

    Ok(DownloadedVideo {
        video_id: video_id.to_string(),
        filename: VideoStore::filename_for(video_id),
        path,
        bytes_written,
    })
}

/// Write every chunk of `stream` to a new file at `path`, returning the
/// total byte count.
///
/// On any error the partially written file is removed before the error
/// is returned.
pub async fn save_stream<S, B, E>(stream: S, path: &Path) -> Result<u64, VideoGenError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<VideoGenError>,
{
    match write_chunks(stream, path).await {
        Ok(total) => Ok(total),
        Err(e) => {
            remove_partial(path).await;
            Err(e)
        }
    }
}

async fn write_chunks<S, B, E>(stream: S, path: &Path) -> Result<u64, VideoGenError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<VideoGenError>,
{
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);
    let mut total: u64 = 0;

    let mut stream = std::pin::pin!(stream);
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(Into::into)?;
        let bytes = chunk.as_ref();
        if bytes.is_empty() {
            continue;
        }
        writer.write_all(bytes).await?;
        total += bytes.len() as u64;
    }

    writer.flush().await?;
    Ok(total)
}

async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            tracing::warn!(path = %path.display(), "Removed partial video after failed download");
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "Failed to remove partial video",
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
