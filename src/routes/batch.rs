// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Batch submission API.

use crate::error::{AppError, Result};
use crate::models::{BatchStatus, FeedbackEntry, FeedbackRequest, Sentiment};
use crate::time_utils::today;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/feedback/batch", post(process_batch))
        .route("/api/v1/feedback/batch/async", post(process_batch_async))
        .route("/api/v1/feedback/batch/{batch_id}", get(get_batch_status))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BatchProcessingResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_submitted: usize,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub successful: usize,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub failed: usize,
    pub status: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AsyncBatchResponse {
    pub batch_id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_submitted: usize,
    pub status: String,
    pub message: String,
}

/// Reject empty batches and validate every request.
///
/// Validation errors are keyed `[index].field`.
fn validate_batch(requests: &[FeedbackRequest]) -> Result<()> {
    if requests.is_empty() {
        return Err(AppError::BadRequest(
            "Batch must contain at least one feedback entry".to_string(),
        ));
    }

    let mut fields = BTreeMap::new();
    for (index, request) in requests.iter().enumerate() {
        if let Err(e) = request.validate() {
            if let AppError::Validation(errors) = AppError::from_validation(&e) {
                for (field, message) in errors {
                    fields.insert(format!("[{}].{}", index, field), message);
                }
            }
        }
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(fields))
    }
}

/// New entries with sentiment; analysis failures fall back to neutral.
fn prepare_entries(state: &AppState, requests: Vec<FeedbackRequest>) -> Vec<FeedbackEntry> {
    let date = today();
    requests
        .into_iter()
        .map(|request| {
            let mut entry = FeedbackEntry::from_request(state.ids.next_id(), request, date);
            let sentiment = state.sentiment.analyze(&entry.comment).unwrap_or_else(|e| {
                tracing::warn!(
                    feedback_id = entry.id,
                    error = %e,
                    "Sentiment analysis failed, using Neutral"
                );
                Sentiment::Neutral
            });
            entry.sentiment = Some(sentiment);
            entry
        })
        .collect()
}

/// Process a batch and wait for the result.
async fn process_batch(
    State(state): State<Arc<AppState>>,
    Json(requests): Json<Vec<FeedbackRequest>>,
) -> Result<(StatusCode, Json<BatchProcessingResponse>)> {
    validate_batch(&requests)?;

    let total_submitted = requests.len();
    let entries = prepare_entries(&state, requests);
    let result = state.batch_processor.process_batch(entries, None).await;

    Ok((
        StatusCode::CREATED,
        Json(BatchProcessingResponse {
            total_submitted,
            successful: result.successful_entries,
            failed: result.failed_entries,
            status: "COMPLETED".to_string(),
            errors: result.errors,
        }),
    ))
}

/// Accept a batch and process it in the background.
async fn process_batch_async(
    State(state): State<Arc<AppState>>,
    Json(requests): Json<Vec<FeedbackRequest>>,
) -> Result<(StatusCode, Json<AsyncBatchResponse>)> {
    validate_batch(&requests)?;

    let total_submitted = requests.len();
    let batch_id = state.ids.next_batch_id();
    state.batch_tracker.start(&batch_id, total_submitted);
    tracing::info!(batch_id = %batch_id, total_submitted, "Starting background batch");

    let task_state = state.clone();
    let task_batch_id = batch_id.clone();
    let worker = tokio::spawn(async move {
        let entries = prepare_entries(&task_state, requests);
        let progress = task_state.batch_tracker.progress_for(&task_batch_id);
        task_state
            .batch_processor
            .process_batch(entries, Some(&progress))
            .await;
    });

    // A worker that dies never reports completion, so record the failure here
    let tracker = state.batch_tracker.clone();
    let watched_batch_id = batch_id.clone();
    tokio::spawn(async move {
        if let Err(e) = worker.await {
            tracing::error!(batch_id = %watched_batch_id, error = %e, "Background batch aborted");
            tracker.fail(
                &watched_batch_id,
                &format!("Batch processing aborted: {}", e),
            );
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(AsyncBatchResponse {
            batch_id,
            total_submitted,
            status: "PROCESSING".to_string(),
            message: "Batch submitted successfully and is being processed".to_string(),
        }),
    ))
}

async fn get_batch_status(
    State(state): State<Arc<AppState>>,
    Path(batch_id): Path<String>,
) -> Result<Json<BatchStatus>> {
    state
        .batch_tracker
        .get(&batch_id)
        .map(Json)
        .ok_or(AppError::BatchNotFound(batch_id))
}
