use soragen_core::error::CoreError;

/// Errors from the submit, poll, and download pipeline.
#[derive(Debug, thiserror::Error)]
pub enum VideoGenError {
    /// Missing credential, missing job ID, or an unsafe job ID.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream answered with an unexpected status code.
    #[error("{message}")]
    Upstream {
        /// HTTP status code returned by the upstream.
        status: u16,
        /// Human-readable message, already prefixed with the failed step.
        message: String,
    },

    /// The job reached `failed`; carries the upstream reason.
    #[error("Video generation failed: {0}")]
    JobFailed(String),

    /// The wait budget ran out before the job finished.
    #[error("Video generation timeout")]
    Timeout { waited_secs: u64 },

    /// Writing the video to disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
