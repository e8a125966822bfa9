// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single feedback submission (HTML form, JSON, and background).

use crate::error::{AppError, Result};
use crate::models::{EnhancedFeedback, FeedbackEntry, FeedbackRequest, FeedbackResponse};
use crate::routes::validate;
use crate::time_utils::today;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Redirect,
    routing::post,
    Form, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/feedback/raw", post(submit_form))
        .route("/api/v1/feedback/raw/api", post(submit_json))
        .route("/api/v1/feedback/raw/async", post(submit_async))
}

/// Accepted-for-processing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AsyncProcessingResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub feedback_id: u64,
    pub status: String,
    pub message: String,
}

/// Analyse, enhance and store a new entry.
async fn process_entry(state: &AppState, mut entry: FeedbackEntry) -> Result<EnhancedFeedback> {
    let sentiment = state
        .sentiment
        .analyze(&entry.comment)
        .map_err(|e| AppError::SentimentAnalysis(e.to_string()))?;
    entry.sentiment = Some(sentiment);
    tracing::debug!(feedback_id = entry.id, %sentiment, "Sentiment analysis complete");

    let enhanced = state.feedback_service.enhance(entry).await;
    state.feedback_service.save_enhanced(&enhanced).await?;
    Ok(enhanced)
}

fn new_entry(state: &AppState, request: FeedbackRequest) -> FeedbackEntry {
    FeedbackEntry::from_request(state.ids.next_id(), request, today())
}

/// HTML form submission; always answers with a redirect.
async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(request): Form<FeedbackRequest>,
) -> Redirect {
    if let Err(e) = request.validate() {
        tracing::warn!(errors = %e, "Invalid feedback form");
        return Redirect::to("/submit?error=invalid");
    }

    tracing::info!(customer = %request.customer, "Processing feedback form");
    let entry = new_entry(&state, request);
    match process_entry(&state, entry).await {
        Ok(enhanced) => {
            tracing::info!(feedback_id = enhanced.entry.id, "Feedback form processed");
            Redirect::to("/success")
        }
        Err(e) => {
            tracing::error!(error = %e, "Error processing feedback form");
            Redirect::to("/submit?error=server")
        }
    }
}

async fn submit_json(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>)> {
    validate(&request)?;

    tracing::info!(customer = %request.customer, "Processing feedback via API");
    let entry = new_entry(&state, request);
    let enhanced = process_entry(&state, entry).await?;

    Ok((StatusCode::CREATED, Json(enhanced.into())))
}

/// Accept feedback and process it in the background.
async fn submit_async(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FeedbackRequest>,
) -> Result<(StatusCode, Json<AsyncProcessingResponse>)> {
    validate(&request)?;

    let entry = new_entry(&state, request);
    let feedback_id = entry.id;
    tracing::info!(feedback_id, "Starting background feedback processing");

    let task_state = state.clone();
    tokio::spawn(async move {
        match process_entry(&task_state, entry).await {
            Ok(_) => tracing::info!(feedback_id, "Background processing complete"),
            Err(e) => tracing::error!(feedback_id, error = %e, "Background processing failed"),
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(AsyncProcessingResponse {
            feedback_id,
            status: "PROCESSING".to_string(),
            message: "Feedback submitted successfully and is being processed".to_string(),
        }),
    ))
}
