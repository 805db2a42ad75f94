//! Poll a job until it finishes, then download its video.
//!
//! One sequential loop per job. Between polls the task sleeps
//! cooperatively for [`poll_interval`], so many jobs can wait on one
//! runtime without a thread each. The loop has no cancellation path: it
//! ends on `completed`, `failed`, an error, or the wait budget.

use std::time::Duration;

use soragen_core::job::{poll_interval, JobStatus};
use soragen_core::storage::VideoStore;
use tokio::time::Instant;

use crate::api::VideoApiClient;
use crate::download::{download_video, DownloadedVideo};
use crate::error::VideoGenError;

/// Poll `video_id` until it reaches a terminal state or `max_wait` runs out.
///
/// - `completed`: the video is downloaded into `store` and returned.
/// - `failed`: [`VideoGenError::JobFailed`] with the upstream reason; no
///   download is attempted.
/// - budget exhausted: [`VideoGenError::Timeout`].
///
/// The sleep before the next poll never overshoots the remaining budget,
/// so a timeout is reported close to `max_wait` after the first poll.
pub async fn wait_for_completion(
    api: &VideoApiClient,
    store: &VideoStore,
    video_id: &str,
    max_wait: Duration,
) -> Result<DownloadedVideo, VideoGenError> {
    let started = Instant::now();
    let mut polls: u32 = 0;

    while started.elapsed() < max_wait {
        let job = api.retrieve_video(video_id).await?;
        polls += 1;

        match job.status {
            JobStatus::Completed => {
                tracing::info!(
                    video_id,
                    polls,
                    elapsed_secs = started.elapsed().as_secs(),
                    "Video completed, downloading content",
                );
                return download_video(api, store, video_id).await;
            }
            JobStatus::Failed => {
                let reason = job.failure_message();
                tracing::warn!(video_id, polls, reason = %reason, "Video generation failed");
                return Err(VideoGenError::JobFailed(reason));
            }
            ref pending => {
                tracing::debug!(
                    video_id,
                    status = %pending,
                    progress = ?job.progress,
                    polls,
                    "Video still pending",
                );
            }
        }

        let elapsed = started.elapsed();
        let delay = poll_interval(elapsed).min(max_wait.saturating_sub(elapsed));
        tokio::time::sleep(delay).await;
    }

    tracing::warn!(video_id, polls, max_wait_secs = max_wait.as_secs(), "Video generation timed out");
    Err(VideoGenError::Timeout {
        waited_secs: max_wait.as_secs(),
    })
}
