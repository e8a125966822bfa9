// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Retail Feedback: customer feedback analysis for retail stores
//!
//! This crate provides the web service that scores the sentiment of customer
//! comments, enriches them through a generative language API, and stores
//! them in a human-readable report file.

pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod views;

use config::Config;
use db::FeedbackStore;
use error::AppError;
use ids::IdGenerator;
use services::{BatchProcessor, BatchTracker, FeedbackService, GeminiClient, SentimentAnalyzer};
use std::sync::Arc;
use views::Views;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub feedback_service: Arc<FeedbackService>,
    pub sentiment: SentimentAnalyzer,
    pub batch_processor: BatchProcessor,
    pub batch_tracker: Arc<BatchTracker>,
    pub ids: IdGenerator,
    pub views: Views,
}

impl AppState {
    /// Wire up all services from configuration.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let store = FeedbackStore::new(config.feedback_file_path.clone());
        let gemini = GeminiClient::new(&config.gemini)?;
        let feedback_service = Arc::new(FeedbackService::new(
            store,
            gemini,
            config.enhancement_concurrency,
        ));
        let batch_processor =
            BatchProcessor::new(feedback_service.clone(), config.enhancement_concurrency);
        let views = Views::new().map_err(|e| AppError::Internal(e.into()))?;

        Ok(Self {
            config,
            feedback_service,
            sentiment: SentimentAnalyzer::new(),
            batch_processor,
            batch_tracker: Arc::new(BatchTracker::new()),
            ids: IdGenerator::new(),
            views,
        })
    }
}
