//! Local video directory.
//!
//! Finished videos are flat files named `<job_id>.mp4`. A file is the only
//! record of a completed job, so a repeated job ID overwrites the earlier
//! file. Nothing here deletes finished videos.

use std::path::{Component, Path, PathBuf};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Directory used when none is configured.
pub const DEFAULT_VIDEOS_DIR: &str = "videos";

/// Extension of stored videos.
pub const VIDEO_EXTENSION: &str = "mp4";

/// Content type of stored videos.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

const VIDEO_ENTITY: &str = "Video";

// ---------------------------------------------------------------------------
// VideoStore
// ---------------------------------------------------------------------------

/// Handle to the directory holding finished videos.
///
/// Cheap to clone; it only carries the root path. Tests point it at a
/// temporary directory.
#[derive(Debug, Clone)]
pub struct VideoStore {
    root: PathBuf,
}

impl VideoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory (and parents) if it does not exist yet.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// File name a job's video is stored under.
    pub fn filename_for(video_id: &str) -> String {
        format!("{video_id}.{VIDEO_EXTENSION}")
    }

    /// Destination path for a job's video.
    ///
    /// Job IDs come from the upstream service; one that would escape the
    /// directory is refused.
    pub fn artifact_path(&self, video_id: &str) -> Result<PathBuf, CoreError> {
        let filename = Self::filename_for(video_id);
        if !is_plain_filename(&filename) {
            return Err(CoreError::Internal(format!(
                "Refusing to store video with unsafe id '{video_id}'"
            )));
        }
        Ok(self.root.join(filename))
    }

    /// Resolve a requested file name to an existing file in the store.
    ///
    /// Anything that is not a bare file name, or does not name a regular
    /// file, is reported as not found.
    pub async fn locate(&self, filename: &str) -> Result<PathBuf, CoreError> {
        let not_found = || CoreError::NotFound {
            entity: VIDEO_ENTITY,
            id: filename.to_string(),
        };

        if !is_plain_filename(filename) {
            return Err(not_found());
        }

        let path = self.root.join(filename);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(not_found()),
        }
    }
}

/// A single normal path component: no separators, no `.` or `..`.
fn is_plain_filename(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Guess a Content-Type from a file extension.
pub fn content_type_for_extension(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => VIDEO_CONTENT_TYPE,
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
