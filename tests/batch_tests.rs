// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Batch submission tests.

use axum::http::StatusCode;
use serde_json::json;
use std::time::Duration;
use tower::ServiceExt;

mod common;

use common::{body_json, empty_request, json_request};

fn batch(n: usize) -> serde_json::Value {
    (0..n)
        .map(|i| {
            json!({
                "customer": format!("Customer {}", i),
                "department": "Produce",
                "comment": "The staff was helpful."
            })
        })
        .collect()
}

#[tokio::test]
async fn test_batch_processes_all_entries() {
    let app = common::create_test_app();

    let response = app
        .router
        .oneshot(json_request("POST", "/api/v1/feedback/batch", batch(3)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["totalSubmitted"], 3);
    assert_eq!(body["successful"], 3);
    assert_eq!(body["failed"], 0);
    assert_eq!(body["status"], "COMPLETED");
    assert!(body["errors"].as_array().unwrap().is_empty());

    let stored = app.state.feedback_service.store().find_all().await.unwrap();
    assert_eq!(stored.len(), 3);

    // Every entry gets a distinct id
    let mut ids: Vec<u64> = stored.iter().map(|e| e.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_empty_batch_rejected() {
    let app = common::create_test_app();

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/v1/feedback/batch", json!([])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/api/v1/feedback/batch/async",
            json!([]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_with_invalid_entry_rejected() {
    let app = common::create_test_app();

    let response = app
        .router
        .oneshot(json_request(
            "POST",
            "/api/v1/feedback/batch",
            json!([
                { "customer": "Ann", "department": "Deli", "comment": "Good" },
                { "customer": "Ben", "department": "", "comment": "Bad" }
            ]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["validationErrors"]["[1].department"].is_string());
    assert!(app
        .state
        .feedback_service
        .store()
        .find_all()
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_async_batch_can_be_polled() {
    let app = common::create_test_app();

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/v1/feedback/batch/async", batch(4)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "PROCESSING");
    assert_eq!(body["totalSubmitted"], 4);
    assert_eq!(
        body["message"],
        "Batch submitted successfully and is being processed"
    );
    let batch_id = body["batchId"].as_str().unwrap().to_string();
    assert!(batch_id.starts_with("BATCH-"));

    let uri = format!("/api/v1/feedback/batch/{}", batch_id);
    let mut status = serde_json::Value::Null;
    for _ in 0..50 {
        let response = app
            .router
            .clone()
            .oneshot(empty_request("GET", &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        status = body_json(response).await;
        if status["status"] == "COMPLETED" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(status["status"], "COMPLETED");
    assert_eq!(status["batchId"], batch_id);
    assert_eq!(status["processed"], 4);
    assert_eq!(status["successful"], 4);
    assert_eq!(status["percentage"], 100.0);
    assert!(status["completedAt"].is_string());
}

#[tokio::test]
async fn test_unknown_batch_not_found() {
    let app = common::create_test_app();

    let response = app
        .router
        .oneshot(empty_request("GET", "/api/v1/feedback/batch/BATCH-1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Batch not found with id: BATCH-1");
    assert_eq!(body["path"], "/api/v1/feedback/batch/BATCH-1");
}
