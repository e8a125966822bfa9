// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feedback query and management API.

use crate::error::{AppError, Result};
use crate::models::{FeedbackResponse, FeedbackSummaryDto, Sentiment};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/feedback", get(list_feedback))
        .route("/api/v1/feedback/summary", get(get_summary))
        .route("/api/v1/feedback/refresh", post(refresh_cache))
        .route(
            "/api/v1/feedback/{id}",
            get(get_feedback).delete(delete_feedback),
        )
}

/// Optional list filters.
#[derive(Debug, Deserialize)]
pub struct FeedbackFilter {
    pub department: Option<String>,
    pub sentiment: Option<String>,
}

/// List enhanced feedback, optionally filtered by department and sentiment.
async fn list_feedback(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<FeedbackFilter>,
) -> Result<Json<Vec<FeedbackResponse>>> {
    let department = filter
        .department
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());
    let sentiment = match filter.sentiment.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(
            raw.parse::<Sentiment>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?,
        ),
        _ => None,
    };

    let feedback = state
        .feedback_service
        .filtered(department, sentiment)
        .await?;

    Ok(Json(
        feedback.into_iter().map(FeedbackResponse::from).collect(),
    ))
}

async fn get_summary(State(state): State<Arc<AppState>>) -> Result<Json<FeedbackSummaryDto>> {
    let summary = state.feedback_service.summary().await?;
    Ok(Json(summary.into()))
}

async fn get_feedback(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<FeedbackResponse>> {
    let feedback = state.feedback_service.find_by_id(id).await?;
    Ok(Json(feedback.into()))
}

async fn delete_feedback(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    state.feedback_service.delete_by_id(id).await?;
    tracing::info!(feedback_id = id, "Deleted feedback");
    Ok(StatusCode::NO_CONTENT)
}

/// Drop cached enhancements so the next read re-enhances from storage.
async fn refresh_cache(State(state): State<Arc<AppState>>) -> &'static str {
    state.feedback_service.clear_cache().await;
    tracing::info!("Feedback cache cleared");
    "Feedback cache cleared successfully"
}
