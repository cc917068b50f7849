//! In-process stand-in for the custom metrics endpoint.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use pelanor_metrics::UploaderConfig;
use serde_json::Value;

pub const TEST_TOKEN: &str = "test-token";

/// A request as seen by the mock API.
#[derive(Debug, Clone)]
pub struct Captured {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<Mutex<VecDeque<(StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<Captured>>>,
    delay: Option<Duration>,
}

/// Mock server handle.
pub struct MockApi {
    pub base_url: String,
    state: MockState,
}

impl MockApi {
    /// Start a server answering with `responses` in order (then 201 `{"id":"default"}`).
    pub async fn start(responses: Vec<(u16, &str)>) -> Self {
        Self::start_inner(responses, None).await
    }

    /// Start a server that waits `delay` before every answer.
    pub async fn start_slow(delay: Duration) -> Self {
        Self::start_inner(Vec::new(), Some(delay)).await
    }

    async fn start_inner(responses: Vec<(u16, &str)>, delay: Option<Duration>) -> Self {
        let state = MockState {
            responses: Arc::new(Mutex::new(
                responses
                    .into_iter()
                    .map(|(s, b)| (StatusCode::from_u16(s).unwrap(), b.to_string()))
                    .collect(),
            )),
            requests: Arc::default(),
            delay,
        };

        let app = Router::new()
            .route("/v1/custom-metrics", post(custom_metrics))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            state,
        }
    }

    pub fn config(&self) -> UploaderConfig {
        UploaderConfig::new(TEST_TOKEN).with_base_url(&self.base_url)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn custom_metrics(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let get = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(Captured {
        authorization: get(header::AUTHORIZATION),
        content_type: get(header::CONTENT_TYPE),
        body,
    });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    let next = state.responses.lock().unwrap().pop_front();
    next.unwrap_or((StatusCode::CREATED, r#"{"id":"default"}"#.to_string()))
}

/// Write `content` to `name` inside a fresh temp dir.
pub fn write_csv(name: &str, content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    (dir, path)
}
