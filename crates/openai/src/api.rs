//! REST client for the OpenAI Videos endpoints.
//!
//! Wraps `POST /videos` (create), `GET /videos/{id}` (status), and
//! `GET /videos/{id}/content` (download) using [`reqwest`].

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use soragen_core::error::CoreError;
use soragen_core::generation::GenerationRequest;
use soragen_core::job::JobStatus;

use crate::error::VideoGenError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Production API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Total timeout for the job creation call.
pub const CREATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Total timeout for a single status poll.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(120);

/// Connect timeout for every call, including the content download.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest silence tolerated between reads of a response body. Bounds the
/// content download, which has no total timeout.
pub const READ_TIMEOUT: Duration = Duration::from_secs(120);

/// Message reported when no credential is configured.
pub const MISSING_API_KEY_MESSAGE: &str =
    "OPENAI_API_KEY not configured. Please set it in .env file";

const UNKNOWN_ERROR: &str = "Unknown error";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Where the API lives and how to authenticate against it.
#[derive(Clone)]
pub struct VideoApiConfig {
    /// Base URL without trailing slash, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer credential. `None` makes every call fail before hitting the
    /// network.
    pub api_key: Option<String>,
    /// Per-read timeout applied to every response, see [`READ_TIMEOUT`].
    pub read_timeout: Duration,
}

impl VideoApiConfig {
    /// Build a config, treating an empty or blank key as absent.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        Self {
            base_url,
            api_key,
            read_timeout: READ_TIMEOUT,
        }
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for VideoApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// JSON body of `POST /videos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateVideoPayload {
    pub model: String,
    pub prompt: String,
    pub size: String,
    /// Clip length as a decimal string; omitted for a zero duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds: Option<String>,
}

impl From<&GenerationRequest> for CreateVideoPayload {
    fn from(req: &GenerationRequest) -> Self {
        Self {
            model: req.model.clone(),
            prompt: req.prompt.clone(),
            size: req.size.clone(),
            seconds: (req.duration > 0).then(|| req.duration.to_string()),
        }
    }
}

/// The fields of a creation response we rely on.
#[derive(Debug, Deserialize)]
struct CreateVideoResponse {
    #[serde(default)]
    id: Option<String>,
}

/// A video job as returned by `GET /videos/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoJob {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: JobStatus,
    /// Percent complete, when the upstream reports it.
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub error: Option<JobError>,
}

/// Error object attached to a failed job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobError {
    #[serde(default)]
    pub message: Option<String>,
}

impl VideoJob {
    /// Upstream failure reason, or `"Unknown error"` when none was given.
    pub fn failure_message(&self) -> String {
        self.error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text.
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Videos API.
///
/// Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct VideoApiClient {
    client: reqwest::Client,
    config: VideoApiConfig,
}

impl VideoApiClient {
    /// Create a client with the connect timeout and the config's read
    /// timeout. Redirects are followed (reqwest's default policy), which the
    /// content endpoint relies on.
    pub fn new(config: VideoApiConfig) -> Result<Self, VideoGenError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(config.read_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn has_api_key(&self) -> bool {
        self.config.has_api_key()
    }

    /// Submit a generation job and return its upstream ID.
    ///
    /// Accepts 200 and 201. Other statuses fail with the upstream status
    /// and the best message that can be extracted from the body.
    pub async fn create_video(&self, payload: &CreateVideoPayload) -> Result<String, VideoGenError> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .post(self.url("/videos"))
            .header(AUTHORIZATION, bearer(api_key))
            .timeout(CREATE_TIMEOUT)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
            let body = read_body(response).await;
            return Err(VideoGenError::Upstream {
                status: status.as_u16(),
                message: format!("Failed to create video: {}", extract_error_message(&body)),
            });
        }

        let created: CreateVideoResponse = response.json().await?;
        created
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CoreError::Internal("No video ID returned".into()).into())
    }

    /// Fetch the current state of a job.
    pub async fn retrieve_video(&self, video_id: &str) -> Result<VideoJob, VideoGenError> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(self.url(&format!("/videos/{video_id}")))
            .header(AUTHORIZATION, bearer(api_key))
            .timeout(STATUS_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = read_body(response).await;
            return Err(VideoGenError::Upstream {
                status: status.as_u16(),
                message: format!("Failed to check video status: {body}"),
            });
        }

        Ok(response.json().await?)
    }

    /// Open the content stream of a completed job.
    ///
    /// Returns the response with its body unread so the caller can stream
    /// it. No total timeout is applied, but a body that stalls for longer
    /// than the read timeout fails the stream with a request error.
    pub async fn open_content(&self, video_id: &str) -> Result<reqwest::Response, VideoGenError> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(self.url(&format!("/videos/{video_id}/content")))
            .header(AUTHORIZATION, bearer(api_key))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = read_body(response).await;
            return Err(VideoGenError::Upstream {
                status: status.as_u16(),
                message: format!("Failed to download video content: {body}"),
            });
        }

        Ok(response)
    }

    // ---- private helpers ----

    fn api_key(&self) -> Result<&str, VideoGenError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| CoreError::Configuration(MISSING_API_KEY_MESSAGE.into()).into())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }
}

fn bearer(api_key: &str) -> String {
    format!("Bearer {api_key}")
}

async fn read_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
