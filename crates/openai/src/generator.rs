//! Submit → poll → download pipeline.

use std::time::Duration;

use soragen_core::generation::GenerationRequest;
use soragen_core::job::DEFAULT_MAX_WAIT_SECS;
use soragen_core::storage::VideoStore;

use crate::api::{CreateVideoPayload, VideoApiClient};
use crate::download::DownloadedVideo;
use crate::error::VideoGenError;
use crate::poller::wait_for_completion;

/// Runs one generation request end to end.
///
/// Holds no per-job state; concurrent calls to [`generate`](Self::generate)
/// share only the HTTP connection pool and the video directory.
#[derive(Debug, Clone)]
pub struct VideoGenerator {
    api: VideoApiClient,
    store: VideoStore,
    max_wait: Duration,
}

impl VideoGenerator {
    pub fn new(api: VideoApiClient, store: VideoStore) -> Self {
        Self {
            api,
            store,
            max_wait: Duration::from_secs(DEFAULT_MAX_WAIT_SECS),
        }
    }

    /// Override the wait budget.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn api(&self) -> &VideoApiClient {
        &self.api
    }

    /// Create the upstream job, wait for it, and store the result.
    ///
    /// A missing credential fails before any network call.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<DownloadedVideo, VideoGenError> {
        let payload = CreateVideoPayload::from(request);
        let video_id = self.api.create_video(&payload).await?;

        tracing::info!(
            video_id = %video_id,
            model = %payload.model,
            size = %payload.size,
            seconds = ?payload.seconds,
            "Video job created",
        );

        wait_for_completion(&self.api, &self.store, &video_id, self.max_wait).await
    }
}
