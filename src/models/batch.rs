// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Batch processing results and background batch status.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::EnhancedFeedback;

/// Outcome of processing a batch of feedback entries.
#[derive(Debug, Clone, Default)]
pub struct BatchProcessingResult {
    pub total_entries: usize,
    pub processed_entries: usize,
    pub successful_entries: usize,
    pub failed_entries: usize,
    /// Enhanced entries that were processed and stored
    pub results: Vec<EnhancedFeedback>,
    /// One message per failed entry
    pub errors: Vec<String>,
    /// False if the batch was aborted before all entries were processed
    pub completed: bool,
}

/// Lifecycle of a background batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum BatchState {
    Processing,
    Completed,
    Failed,
}

/// Status of a background batch, polled by clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BatchStatus {
    pub batch_id: String,
    pub status: BatchState,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_submitted: usize,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub processed: usize,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub successful: usize,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub failed: usize,
    pub percentage: f64,
    pub errors: Vec<String>,
    pub submitted_at: String,
    pub completed_at: Option<String>,
}

impl BatchStatus {
    /// A freshly submitted batch.
    pub fn processing(batch_id: String, total_submitted: usize, submitted_at: String) -> Self {
        Self {
            batch_id,
            status: BatchState::Processing,
            total_submitted,
            processed: 0,
            successful: 0,
            failed: 0,
            percentage: 0.0,
            errors: Vec::new(),
            submitted_at,
            completed_at: None,
        }
    }
}
