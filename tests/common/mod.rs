// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use retail_feedback::config::Config;
use retail_feedback::routes::create_router;
use retail_feedback::AppState;
use std::sync::Arc;
use tempfile::TempDir;

/// Test app plus the temporary directory holding its feedback file.
/// The directory is removed when dropped, so keep it alive for the test.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub dir: TempDir,
}

fn build(config_fn: impl FnOnce(&mut Config)) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = Config::test_default();
    config.feedback_file_path = dir.path().join("feedback.txt");
    config_fn(&mut config);

    let state = Arc::new(AppState::new(config).expect("Failed to build state"));
    TestApp {
        router: create_router(state.clone()),
        state,
        dir,
    }
}

/// Create a test app with no generative API key configured.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    build(|_| {})
}

/// Create a test app whose generative API points at `api_url`.
#[allow(dead_code)]
pub fn create_test_app_with_gemini(api_url: String) -> TestApp {
    build(|config| {
        config.gemini.api_key = Some("test-key".to_string());
        config.gemini.api_url = api_url;
    })
}

/// A `generateContent` response whose first candidate text is `text`.
#[allow(dead_code)]
pub fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
