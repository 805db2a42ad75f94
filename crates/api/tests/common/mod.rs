#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get as route_get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use soragen_api::config::ServerConfig;
use soragen_api::router::build_app_router;
use soragen_api::state::AppState;

pub const TEST_API_KEY: &str = "sk-test-key";
pub const TEST_VIDEO_ID: &str = "video_test123";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` pointing at `videos_dir` and `api_base`.
pub fn test_config(videos_dir: &Path, api_base: &str, api_key: Option<&str>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8000".to_string()],
        request_timeout_secs: 60,
        openai_api_key: api_key.map(str::to_string),
        openai_api_base: api_base.to_string(),
        videos_dir: videos_dir.to_path_buf(),
        index_file: videos_dir.join("index.html"),
        max_wait_secs: 30,
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(config: ServerConfig) -> Router {
    let state = AppState::from_config(config.clone()).unwrap();
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_with_header(app: Router, uri: &str, name: &str, value: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(name, value)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Mock upstream
// ---------------------------------------------------------------------------

/// Scripted Videos API: jobs are returned in order, the last one repeats.
pub struct MockUpstream {
    pub base_url: String,
    pub content: Vec<u8>,
    pub calls: Arc<AtomicUsize>,
    pub payloads: Arc<Mutex<Vec<Value>>>,
}

impl MockUpstream {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct MockState {
    jobs: Arc<Mutex<VecDeque<Value>>>,
    content: Arc<Vec<u8>>,
    calls: Arc<AtomicUsize>,
    payloads: Arc<Mutex<Vec<Value>>>,
}

pub fn job(status: &str) -> Value {
    json!({ "id": TEST_VIDEO_ID, "object": "video", "status": status })
}

pub fn failed_job(message: &str) -> Value {
    json!({ "id": TEST_VIDEO_ID, "status": "failed", "error": { "message": message } })
}

pub fn sample_video(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 253) as u8).collect()
}

pub async fn spawn_upstream(jobs: Vec<Value>, content: Vec<u8>) -> MockUpstream {
    let state = MockState {
        jobs: Arc::new(Mutex::new(jobs.into_iter().collect())),
        content: Arc::new(content.clone()),
        calls: Arc::new(AtomicUsize::new(0)),
        payloads: Arc::new(Mutex::new(Vec::new())),
    };
    let calls = Arc::clone(&state.calls);
    let payloads = Arc::clone(&state.payloads);

    let app = Router::new()
        .route("/videos", post(mock_create))
        .route("/videos/{id}", route_get(mock_retrieve))
        .route("/videos/{id}/content", route_get(mock_content))
        .route("/files/{id}", route_get(mock_file))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        base_url: format!("http://{addr}"),
        content,
        calls,
        payloads,
    }
}

async fn mock_create(
    axum::extract::State(state): axum::extract::State<MockState>,
    Json(payload): Json<Value>,
) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    state.payloads.lock().unwrap().push(payload);
    (
        StatusCode::CREATED,
        Json(json!({ "id": TEST_VIDEO_ID, "status": "queued" })),
    )
        .into_response()
}

async fn mock_retrieve(axum::extract::State(state): axum::extract::State<MockState>) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
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

async fn mock_content(
    axum::extract::State(state): axum::extract::State<MockState>,
    axum::extract::Path(id): axum::extract::Path<String>,
) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    (StatusCode::FOUND, [(LOCATION, format!("/files/{id}"))]).into_response()
}

async fn mock_file(axum::extract::State(state): axum::extract::State<MockState>) -> Response {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "video/mp4")],
        state.content.as_ref().clone(),
    )
        .into_response()
}
