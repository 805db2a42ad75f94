//! Inbound generation request and outbound response shapes.
//!
//! Sizes and durations are exported as constants for clients and tests,
//! but requests are not checked against them locally: the upstream API
//! rejects unsupported values itself.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Model used when the request omits `model`.
pub const DEFAULT_MODEL: &str = "sora-2";

/// Portrait 720p.
pub const SIZE_720X1280: &str = "720x1280";
/// Landscape 720p.
pub const SIZE_1280X720: &str = "1280x720";
/// Tall portrait.
pub const SIZE_1024X1792: &str = "1024x1792";
/// Wide landscape.
pub const SIZE_1792X1024: &str = "1792x1024";

/// Resolution used when the request omits `size` (vertical).
pub const DEFAULT_SIZE: &str = SIZE_720X1280;

/// Resolutions the upstream API accepts.
pub const SUPPORTED_SIZES: &[&str] = &[SIZE_720X1280, SIZE_1280X720, SIZE_1024X1792, SIZE_1792X1024];

/// Clip length used when the request omits `duration`.
pub const DEFAULT_DURATION_SECS: u32 = 8;

/// Clip lengths (seconds) the upstream API accepts.
pub const SUPPORTED_DURATIONS_SECS: &[u32] = &[4, 8, 12];

/// Path prefix under which finished videos are served.
pub const VIDEO_ROUTE_PREFIX: &str = "/videos";

/// `status` value of a successful [`GenerationResponse`].
pub const STATUS_SUCCESS: &str = "success";

const SUCCESS_MESSAGE: &str = "Video generated successfully";

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Body of `POST /api/generate-video`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Text prompt describing the video.
    pub prompt: String,
    /// Upstream model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Resolution as `WIDTHxHEIGHT`.
    #[serde(default = "default_size")]
    pub size: String,
    /// Clip length in seconds. `0` leaves the choice to the upstream.
    #[serde(default = "default_duration")]
    pub duration: u32,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_size() -> String {
    DEFAULT_SIZE.to_string()
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_SECS
}

impl GenerationRequest {
    /// A request for `prompt` with every other field at its default.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: default_model(),
            size: default_size(),
            duration: default_duration(),
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Body returned once a video has been generated and stored locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Server-relative URL of the stored video.
    pub video_url: String,
    pub status: String,
    pub message: String,
}

impl GenerationResponse {
    pub fn success(filename: &str) -> Self {
        Self {
            video_url: video_url_for(filename),
            status: STATUS_SUCCESS.to_string(),
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// Local URL at which `filename` is served.
pub fn video_url_for(filename: &str) -> String {
    format!("{VIDEO_ROUTE_PREFIX}/{filename}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
