// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generative API client tests against a mock server.

use httpmock::prelude::*;
use retail_feedback::config::GeminiConfig;
use retail_feedback::error::AppError;
use retail_feedback::services::gemini::NO_RESPONSE_TEXT;
use retail_feedback::services::GeminiClient;
use serde_json::json;

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(&GeminiConfig {
        api_key: Some("secret".to_string()),
        api_url: server.url("/v1beta/models/test:generateContent"),
        timeout_secs: 2,
    })
    .unwrap()
}

#[tokio::test]
async fn test_generate_content_request_shape() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/test:generateContent")
                .query_param("key", "secret")
                .json_body(json!({
                    "contents": [{ "parts": [{ "text": "Classify this" }] }],
                    "generationConfig": { "temperature": 0.7, "maxOutputTokens": 1024 }
                }));
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": "Delivery" }] } }]
            }));
        })
        .await;

    let text = client(&server)
        .generate_content("Classify this")
        .await
        .unwrap();

    assert_eq!(text, "Delivery");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_candidates_yield_placeholder() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({ "candidates": [] }));
        })
        .await;

    let text = client(&server).generate_content("hi").await.unwrap();
    assert_eq!(text, NO_RESPONSE_TEXT);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(429).body("quota exceeded");
        })
        .await;

    let err = client(&server).generate_content("hi").await.unwrap_err();
    match err {
        AppError::ExternalApi { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Gemini API returned error: 429");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_external_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).body("not json");
        })
        .await;

    let err = client(&server).generate_content("hi").await.unwrap_err();
    assert!(matches!(err, AppError::ExternalApi { status: 502, .. }));
}
