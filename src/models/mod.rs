// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod batch;
pub mod feedback;
pub mod sentiment;
pub mod summary;

pub use batch::{BatchProcessingResult, BatchState, BatchStatus};
pub use feedback::{EnhancedFeedback, FeedbackEntry, FeedbackRequest, FeedbackResponse};
pub use sentiment::Sentiment;
pub use summary::{FeedbackSummary, FeedbackSummaryDto};
