//! Mock Videos API used by the integration tests.
//!
//! Runs a real axum server on an ephemeral port so the production
//! `reqwest` client is exercised end to end. Every call is counted so
//! tests can assert what did (and did not) hit the network.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, LOCATION};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::{self, StreamExt};
use serde_json::{json, Value};

use soragen_core::storage::VideoStore;
use soragen_openai::api::{VideoApiClient, VideoApiConfig};
use soragen_openai::generator::VideoGenerator;

pub const TEST_API_KEY: &str = "sk-test-key";
pub const TEST_VIDEO_ID: &str = "video_test123";

/// Scripted upstream behaviour.
#[derive(Clone)]
pub struct MockConfig {
    pub create_status: StatusCode,
    pub create_body: String,
    pub poll_status: StatusCode,
    /// Job objects returned by successive polls; the last one repeats.
    pub jobs: Vec<Value>,
    pub content_status: StatusCode,
    pub content: Vec<u8>,
    /// Send the first 16 content bytes, then hold the body open forever.
    pub stall_content: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            create_status: StatusCode::OK,
            create_body: json!({ "id": TEST_VIDEO_ID, "object": "video", "status": "queued" })
                .to_string(),
            poll_status: StatusCode::OK,
            jobs: vec![job("queued"), job("completed")],
            content_status: StatusCode::OK,
            content: sample_video(100_000),
            stall_content: false,
        }
    }
}

/// A job object with the given status.
pub fn job(status: &str) -> Value {
    json!({ "id": TEST_VIDEO_ID, "object": "video", "status": status, "progress": 0 })
}

/// A failed job object carrying `message`.
pub fn failed_job(message: &str) -> Value {
    json!({
        "id": TEST_VIDEO_ID,
        "object": "video",
        "status": "failed",
        "error": { "code": "generation_failed", "message": message },
    })
}

/// Deterministic non-repeating-ish bytes standing in for a video.
pub fn sample_video(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

/// Everything the mock observed.
#[derive(Default)]
pub struct Recorded {
    pub create_calls: AtomicUsize,
    pub poll_calls: AtomicUsize,
    pub content_calls: AtomicUsize,
    pub payloads: Mutex<Vec<Value>>,
    pub auth_headers: Mutex<Vec<String>>,
}

impl Recorded {
    pub fn creates(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }

    pub fn contents(&self) -> usize {
        self.content_calls.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.creates() + self.polls() + self.contents()
    }
}

#[derive(Clone)]
struct MockState {
    config: Arc<MockConfig>,
    jobs: Arc<Mutex<VecDeque<Value>>>,
    recorded: Arc<Recorded>,
}

pub struct MockUpstream {
    pub base_url: String,
    pub recorded: Arc<Recorded>,
    pub content: Vec<u8>,
}

/// Start the mock and return its base URL and call log.
pub async fn spawn_upstream(config: MockConfig) -> MockUpstream {
    let recorded = Arc::new(Recorded::default());
    let content = config.content.clone();
    let state = MockState {
        jobs: Arc::new(Mutex::new(config.jobs.iter().cloned().collect())),
        config: Arc::new(config),
        recorded: Arc::clone(&recorded),
    };

    let app = Router::new()
        .route("/videos", post(create_video))
        .route("/videos/{id}", get(retrieve_video))
        .route("/videos/{id}/content", get(redirect_content))
        .route("/files/{id}", get(serve_content))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        base_url: format!("http://{addr}"),
        recorded,
        content,
    }
}

impl MockUpstream {
    pub fn client(&self, api_key: Option<&str>) -> VideoApiClient {
        let config = VideoApiConfig::new(self.base_url.clone(), api_key.map(str::to_string));
        VideoApiClient::new(config).unwrap()
    }

    pub fn generator(&self, store: VideoStore, max_wait: Duration) -> VideoGenerator {
        VideoGenerator::new(self.client(Some(TEST_API_KEY)), store).with_max_wait(max_wait)
    }

    /// Generator whose client gives up on a body after `read_timeout` of silence.
    pub fn generator_with_read_timeout(
        &self,
        store: VideoStore,
        max_wait: Duration,
        read_timeout: Duration,
    ) -> VideoGenerator {
        let config = VideoApiConfig::new(self.base_url.clone(), Some(TEST_API_KEY.into()))
            .with_read_timeout(read_timeout);
        VideoGenerator::new(VideoApiClient::new(config).unwrap(), store).with_max_wait(max_wait)
    }
}

async fn create_video(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Response {
    state.recorded.create_calls.fetch_add(1, Ordering::SeqCst);
    state.recorded.payloads.lock().unwrap().push(payload);
    if let Some(auth) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        state.recorded.auth_headers.lock().unwrap().push(auth.to_string());
    }

    (
        state.config.create_status,
        [(CONTENT_TYPE, "application/json")],
        state.config.create_body.clone(),
    )
        .into_response()
}

async fn retrieve_video(State(state): State<MockState>, Path(_id): Path<String>) -> Response {
    state.recorded.poll_calls.fetch_add(1, Ordering::SeqCst);

    if state.config.poll_status != StatusCode::OK {
        return (state.config.poll_status, "No such video").into_response();
    }

    let next = {
        let mut jobs = state.jobs.lock().unwrap();
        if jobs.len() > 1 {
            jobs.pop_front()
        } else {
            jobs.front().cloned()
        }
    };

    Json(next.unwrap_or_else(|| job("queued"))).into_response()
}

/// The real API answers the content endpoint with a redirect to storage.
async fn redirect_content(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    state.recorded.content_calls.fetch_add(1, Ordering::SeqCst);

    if state.config.content_status != StatusCode::OK {
        return (state.config.content_status, "storage offline").into_response();
    }

    (StatusCode::FOUND, [(LOCATION, format!("/files/{id}"))]).into_response()
}

async fn serve_content(State(state): State<MockState>, Path(_id): Path<String>) -> Response {
    if state.config.stall_content {
        let head: Vec<u8> = state.config.content.iter().copied().take(16).collect();
        let body = stream::once(async move { Ok::<_, std::io::Error>(head) }).chain(stream::pending());
        return (StatusCode::OK, [(CONTENT_TYPE, "video/mp4")], Body::from_stream(body)).into_response();
    }

    (
        StatusCode::OK,
        [(CONTENT_TYPE, "video/mp4")],
        state.config.content.clone(),
    )
        .into_response()
}
