use std::sync::Arc;
use std::time::Duration;

use soragen_core::storage::VideoStore;
use soragen_openai::api::{VideoApiClient, VideoApiConfig};
use soragen_openai::error::VideoGenError;
use soragen_openai::generator::VideoGenerator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// Nothing in it is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Submit/poll/download pipeline.
    pub generator: Arc<VideoGenerator>,
    /// Video directory used for serving.
    pub store: VideoStore,
}

impl AppState {
    /// Build state from configuration: one HTTP client, one video store.
    pub fn from_config(config: ServerConfig) -> Result<Self, VideoGenError> {
        let api = VideoApiClient::new(VideoApiConfig::new(
            config.openai_api_base.clone(),
            config.openai_api_key.clone(),
        ))?;
        let store = VideoStore::new(config.videos_dir.clone());
        let generator = VideoGenerator::new(api, store.clone())
            .with_max_wait(Duration::from_secs(config.max_wait_secs));

        Ok(Self {
            config: Arc::new(config),
            generator: Arc::new(generator),
            store,
        })
    }
}
