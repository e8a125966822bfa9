// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-rendered pages: dashboard, submission form, confirmation.

use crate::error::{AppError, Result};
use crate::models::{FeedbackResponse, FeedbackSummary, FeedbackSummaryDto};
use crate::views::SubmitError;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(dashboard))
        .route("/submit", get(submit_form))
        .route("/success", get(success))
}

fn render_error(e: tera::Error) -> AppError {
    AppError::Internal(anyhow::anyhow!("Template error: {}", e))
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Response> {
    let enhanced = match state.feedback_service.enhanced_feedback().await {
        Ok(enhanced) => enhanced,
        Err(e) => {
            tracing::error!(error = %e, "Error loading feedback data for dashboard");
            let html = state
                .views
                .error(&format!("Error loading feedback data: {}", e))
                .map_err(render_error)?;
            return Ok((StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response());
        }
    };

    let summary = FeedbackSummaryDto::from(FeedbackSummary::from_feedback(&enhanced));
    let feedback: Vec<FeedbackResponse> = enhanced
        .iter()
        .cloned()
        .map(FeedbackResponse::from)
        .collect();

    let html = state
        .views
        .dashboard(&summary, &feedback)
        .map_err(render_error)?;
    Ok(Html(html).into_response())
}

#[derive(Debug, Deserialize)]
pub struct SubmitQuery {
    pub error: Option<String>,
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SubmitQuery>,
) -> Result<Html<String>> {
    let error = query.error.as_deref().and_then(SubmitError::parse);
    let html = state.views.submit(error).map_err(render_error)?;
    Ok(Html(html))
}

async fn success(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let html = state.views.success().map_err(render_error)?;
    Ok(Html(html))
}
