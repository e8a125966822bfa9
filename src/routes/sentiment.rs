// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ad-hoc sentiment analysis API.

use crate::error::AppError;
use crate::models::feedback::{not_blank, null_as_empty};
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/v1/sentiment/analyze", post(analyze))
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SentimentRequest {
    #[validate(
        custom(function = "not_blank", message = "Text is required"),
        length(
            min = 1,
            max = 5000,
            message = "Text must be between 1 and 5000 characters"
        )
    )]
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SentimentResponse {
    pub text: String,
    pub sentiment: Option<String>,
    pub success: bool,
    pub error: Option<String>,
}

impl SentimentResponse {
    fn failure(text: String, error: String) -> Self {
        Self {
            text,
            sentiment: None,
            success: false,
            error: Some(error),
        }
    }
}

/// Score a piece of text. Failures are reported in the body, not as
/// standard error responses.
async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SentimentRequest>,
) -> (StatusCode, Json<SentimentResponse>) {
    if let Err(errors) = request.validate() {
        let message = match AppError::from_validation(&errors) {
            AppError::Validation(fields) => fields.into_values().next(),
            _ => None,
        }
        .unwrap_or_else(|| "Invalid input".to_string());
        tracing::warn!(error = %message, "Invalid sentiment analysis request");
        return (
            StatusCode::BAD_REQUEST,
            Json(SentimentResponse::failure(request.text, message)),
        );
    }

    let preview: String = request.text.chars().take(50).collect();
    tracing::debug!(text = %preview, "Analyzing sentiment");

    match state.sentiment.analyze(&request.text) {
        Ok(sentiment) => (
            StatusCode::OK,
            Json(SentimentResponse {
                text: request.text,
                sentiment: Some(sentiment.label().to_string()),
                success: true,
                error: None,
            }),
        ),
        Err(AppError::BadRequest(message)) => {
            tracing::warn!(error = %message, "Invalid sentiment analysis request");
            (
                StatusCode::BAD_REQUEST,
                Json(SentimentResponse::failure(request.text, message)),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Error analyzing sentiment");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SentimentResponse::failure(
                    request.text,
                    format!("Failed to analyze sentiment: {}", e),
                )),
            )
        }
    }
}
