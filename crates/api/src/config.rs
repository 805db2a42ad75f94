use std::path::PathBuf;

use soragen_core::job::DEFAULT_MAX_WAIT_SECS;
use soragen_core::storage::DEFAULT_VIDEOS_DIR;
use soragen_openai::api::DEFAULT_API_BASE;

/// Landing page served at `/` when `INDEX_FILE` is unset.
pub const DEFAULT_INDEX_FILE: &str = "static/index.html";

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the
/// API key, whose absence is reported per request rather than at startup.
#[derive(Clone)]
pub struct ServerConfig {
    /// Bind address (default: `127.0.0.1`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Whole-request timeout in seconds. Must exceed the wait budget.
    pub request_timeout_secs: u64,
    /// Upstream credential; `None` when unset or blank.
    pub openai_api_key: Option<String>,
    /// Upstream base URL.
    pub openai_api_base: String,
    /// Directory holding finished videos.
    pub videos_dir: PathBuf,
    /// Static landing page.
    pub index_file: PathBuf,
    /// How long one job may be polled before timing out.
    pub max_wait_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                     |
    /// |------------------------|-----------------------------|
    /// | `HOST`                 | `127.0.0.1`                 |
    /// | `PORT`                 | `8000`                      |
    /// | `CORS_ORIGINS`         | `http://localhost:8000`     |
    /// | `REQUEST_TIMEOUT_SECS` | `900`                       |
    /// | `OPENAI_API_KEY`       | unset                       |
    /// | `OPENAI_API_BASE`      | `https://api.openai.com/v1` |
    /// | `VIDEOS_DIR`           | `videos`                    |
    /// | `INDEX_FILE`           | `static/index.html`         |
    /// | `VIDEO_MAX_WAIT_SECS`  | `600`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:8000".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "900".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let openai_api_base =
            std::env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into());

        let videos_dir = std::env::var("VIDEOS_DIR")
            .unwrap_or_else(|_| DEFAULT_VIDEOS_DIR.into())
            .into();

        let index_file = std::env::var("INDEX_FILE")
            .unwrap_or_else(|_| DEFAULT_INDEX_FILE.into())
            .into();

        let max_wait_secs: u64 = std::env::var("VIDEO_MAX_WAIT_SECS")
            .unwrap_or_else(|_| DEFAULT_MAX_WAIT_SECS.to_string())
            .parse()
            .expect("VIDEO_MAX_WAIT_SECS must be a valid u64");

        if request_timeout_secs <= max_wait_secs {
            tracing::warn!(
                request_timeout_secs,
                max_wait_secs,
                "REQUEST_TIMEOUT_SECS does not exceed VIDEO_MAX_WAIT_SECS; slow jobs will be cut off by the request timeout",
            );
        }

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            openai_api_key,
            openai_api_base,
            videos_dir,
            index_file,
            max_wait_secs,
        }
    }

    pub fn api_key_configured(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("openai_api_base", &self.openai_api_base)
            .field("videos_dir", &self.videos_dir)
            .field("index_file", &self.index_file)
            .field("max_wait_secs", &self.max_wait_secs)
            .finish()
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
