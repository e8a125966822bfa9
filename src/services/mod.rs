// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod batch;
pub mod feedback;
pub mod gemini;
pub mod sentiment;

pub use batch::{BatchProcessor, BatchProgress, BatchTracker, ProgressCallback};
pub use feedback::FeedbackService;
pub use gemini::GeminiClient;
pub use sentiment::SentimentAnalyzer;
