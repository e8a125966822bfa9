// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Feedback not found with id: {0}")]
    NotFound(u64),

    #[error("Batch not found with id: {0}")]
    BatchNotFound(String),

    #[error("Validation failed: {0:?}")]
    Validation(BTreeMap<String, String>),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("External API error ({status}): {message}")]
    ExternalApi { status: u16, message: String },

    #[error("Sentiment analysis failed: {0}")]
    SentimentAnalysis(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Status code used when the generative API cannot be reached at all.
    pub const GATEWAY_STATUS: u16 = 502;

    /// Build a validation error from `validator` output, keeping the first
    /// message reported for each field.
    pub fn from_validation(errors: &validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string());
                (to_camel_case(&field), message)
            })
            .collect();
        AppError::Validation(fields)
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::BatchNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ExternalApi { .. } => StatusCode::BAD_GATEWAY,
            AppError::SentimentAnalysis(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// JSON error response body
///
/// `path` is filled in by [`crate::middleware::add_error_path`], which finds
/// the body in the response extensions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<BTreeMap<String, String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, message, validation_errors) = match self {
            AppError::NotFound(id) => {
                tracing::warn!(feedback_id = id, "Feedback not found");
                (
                    "Not Found",
                    format!("Feedback not found with id: {}", id),
                    None,
                )
            }
            AppError::BatchNotFound(batch_id) => {
                tracing::warn!(batch_id = %batch_id, "Batch not found");
                (
                    "Not Found",
                    format!("Batch not found with id: {}", batch_id),
                    None,
                )
            }
            AppError::Validation(fields) => {
                tracing::warn!(errors = ?fields, "Validation failed");
                (
                    "Validation Failed",
                    "Invalid input data".to_string(),
                    Some(fields),
                )
            }
            AppError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Invalid argument");
                ("Bad Request", msg, None)
            }
            AppError::ExternalApi { status, message } => {
                tracing::error!(status, error = %message, "External API error");
                (
                    "External Service Error",
                    "Failed to communicate with external service".to_string(),
                    None,
                )
            }
            AppError::SentimentAnalysis(msg) => {
                tracing::error!(error = %msg, "Sentiment analysis error");
                (
                    "Sentiment Analysis Failed",
                    "Failed to analyze sentiment".to_string(),
                    None,
                )
            }
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            timestamp: crate::time_utils::format_utc_rfc3339(chrono::Utc::now()),
            status: status.as_u16(),
            error: error.to_string(),
            message,
            path: None,
            validation_errors,
        };

        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Field names are reported the way clients send them.
fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
