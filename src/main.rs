// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Retail Feedback API Server
//!
//! Collects customer feedback, scores its sentiment, and enriches it with
//! categories and actionable insights from a generative language API.

use retail_feedback::{config::Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Retail Feedback API");
    tracing::info!(
        path = %config.feedback_file_path.display(),
        "Using feedback file"
    );
    if config.gemini.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; feedback enhancement will report errors");
    }

    // Build shared state
    let state = Arc::new(AppState::new(config.clone()).expect("Failed to initialize services"));

    // Build router
    let app = retail_feedback::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("retail_feedback=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
