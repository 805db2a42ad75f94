//! Upstream job status model and the poll schedule.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Job accepted, waiting for capacity.
pub const JOB_STATUS_QUEUED: &str = "queued";
/// Job is rendering.
pub const JOB_STATUS_IN_PROGRESS: &str = "in_progress";
/// Job finished; content is downloadable.
pub const JOB_STATUS_COMPLETED: &str = "completed";
/// Job failed; the job object carries an error message.
pub const JOB_STATUS_FAILED: &str = "failed";

// ---------------------------------------------------------------------------
// Poll schedule constants
// ---------------------------------------------------------------------------

/// Default wait budget for a single job (10 minutes).
pub const DEFAULT_MAX_WAIT_SECS: u64 = 600;

/// Delay before the second poll.
pub const INITIAL_POLL_INTERVAL_SECS: f64 = 1.0;

/// Ceiling on the delay between polls.
pub const MAX_POLL_INTERVAL_SECS: f64 = 5.0;

/// Elapsed seconds per extra second of delay.
pub const POLL_RAMP_SECS: f64 = 30.0;

// ---------------------------------------------------------------------------
// JobStatus
// ---------------------------------------------------------------------------

/// Status string reported by the upstream job object.
///
/// Unrecognised values are kept in [`JobStatus::Other`] and treated as
/// still pending.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            JOB_STATUS_QUEUED => Self::Queued,
            JOB_STATUS_IN_PROGRESS => Self::InProgress,
            JOB_STATUS_COMPLETED => Self::Completed,
            JOB_STATUS_FAILED => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => JOB_STATUS_QUEUED,
            Self::InProgress => JOB_STATUS_IN_PROGRESS,
            Self::Completed => JOB_STATUS_COMPLETED,
            Self::Failed => JOB_STATUS_FAILED,
            Self::Other(s) => s,
        }
    }

    /// `completed` and `failed` are final; nothing follows them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Poll schedule
// ---------------------------------------------------------------------------

/// Delay before the next status poll, given time spent polling so far.
///
/// `min(5s, 1s + elapsed / 30)`: grows linearly from one second and
/// settles at five seconds after two minutes. There is no exponential
/// component.
pub fn poll_interval(elapsed: Duration) -> Duration {
    let secs = INITIAL_POLL_INTERVAL_SECS + elapsed.as_secs_f64() / POLL_RAMP_SECS;
    Duration::from_secs_f64(secs.min(MAX_POLL_INTERVAL_SECS))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
