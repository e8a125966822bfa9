// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod batch;
pub mod feedback;
pub mod pages;
pub mod sentiment;
pub mod submit;

use crate::error::{AppError, Result};
use crate::metrics::METRICS;
use crate::AppState;
use axum::extract::State;
use axum::http::{header, Method};
use axum::response::IntoResponse;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "UP".to_string(),
        build_id,
    })
}

/// Service counters in Prometheus text format.
async fn prometheus() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.render(),
    )
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AiStatusResponse {
    pub connected: bool,
}

/// Probe the generative API with a trivial prompt.
async fn ai_status(State(state): State<Arc<AppState>>) -> Json<AiStatusResponse> {
    let connected = state.feedback_service.gemini().test_connection().await;
    Json(AiStatusResponse { connected })
}

/// Run `validator` rules, mapping failures to a 400 response.
pub(crate) fn validate<T: Validate>(value: &T) -> Result<()> {
    value.validate().map_err(|e| AppError::from_validation(&e))
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let ops_routes = Router::new()
        .route("/health", get(health_check))
        .route("/actuator/health", get(health_check))
        .route("/actuator/prometheus", get(prometheus))
        .route("/api/v1/ai/status", get(ai_status));

    Router::new()
        .merge(ops_routes)
        .merge(pages::routes())
        .merge(feedback::routes())
        .merge(submit::routes())
        .merge(batch::routes())
        .merge(sentiment::routes())
        .layer(middleware::from_fn(crate::middleware::add_error_path))
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
