// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Batch feedback processing.
//!
//! Handles:
//! 1. Enhancing each entry with bounded concurrency
//! 2. Persisting every enhanced entry
//! 3. Reporting progress to an optional callback
//! 4. Tracking background batches for status polling

use crate::models::{BatchProcessingResult, BatchState, BatchStatus, FeedbackEntry};
use crate::services::FeedbackService;
use crate::time_utils::format_utc_rfc3339;
use dashmap::DashMap;
use futures_util::{stream, StreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Snapshot passed to progress callbacks after each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub processed: usize,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BatchProgress {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.processed as f64 * 100.0 / self.total as f64
    }
}

/// Receives progress while a batch runs.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, progress: BatchProgress, error: Option<&str>);

    fn on_complete(&self, result: &BatchProcessingResult);
}

/// Enhances and stores batches of feedback.
pub struct BatchProcessor {
    feedback: Arc<FeedbackService>,
    concurrency: usize,
}

impl BatchProcessor {
    pub fn new(feedback: Arc<FeedbackService>, concurrency: usize) -> Self {
        Self {
            feedback,
            concurrency: concurrency.max(1),
        }
    }

    /// Process every entry. Per-entry failures are collected, never fatal.
    pub async fn process_batch(
        &self,
        entries: Vec<FeedbackEntry>,
        progress: Option<&dyn ProgressCallback>,
    ) -> BatchProcessingResult {
        let total = entries.len();
        let mut result = BatchProcessingResult {
            total_entries: total,
            ..Default::default()
        };
        tracing::info!(total, "Processing feedback batch");

        let mut outcomes = stream::iter(entries)
            .map(|entry| async move {
                let id = entry.id;
                let enhanced = self.feedback.enhance(entry).await;
                match self.feedback.save_enhanced(&enhanced).await {
                    Ok(_) => Ok(enhanced),
                    Err(e) => Err(format!("Error processing feedback ID {}: {}", id, e)),
                }
            })
            .buffer_unordered(self.concurrency);

        while let Some(outcome) = outcomes.next().await {
            result.processed_entries += 1;
            let error = match outcome {
                Ok(enhanced) => {
                    result.successful_entries += 1;
                    result.results.push(enhanced);
                    None
                }
                Err(message) => {
                    tracing::warn!(error = %message, "Batch entry failed");
                    result.failed_entries += 1;
                    result.errors.push(message);
                    result.errors.last().map(String::as_str)
                }
            };

            if let Some(callback) = progress {
                callback.on_progress(
                    BatchProgress {
                        processed: result.processed_entries,
                        total,
                        successful: result.successful_entries,
                        failed: result.failed_entries,
                    },
                    error,
                );
            }
        }

        result.completed = true;
        tracing::info!(
            total,
            successful = result.successful_entries,
            failed = result.failed_entries,
            "Batch processing complete"
        );

        if let Some(callback) = progress {
            callback.on_complete(&result);
        }
        result
    }
}

/// Finished batches kept for polling before the oldest are dropped.
pub const DEFAULT_FINISHED_RETENTION: usize = 100;

struct TrackedBatch {
    status: BatchStatus,
    /// Order in which the batch finished; `None` while processing
    finished: Option<u64>,
}

/// In-memory status of background batches, keyed by batch ID.
///
/// Batches still processing are always kept. Only the most recent
/// `retention` finished batches are kept; older ones are pruned whenever a
/// new batch starts.
pub struct BatchTracker {
    batches: DashMap<String, TrackedBatch>,
    retention: usize,
    finished_seq: AtomicU64,
}

impl Default for BatchTracker {
    fn default() -> Self {
        Self::with_retention(DEFAULT_FINISHED_RETENTION)
    }
}

impl BatchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: usize) -> Self {
        Self {
            batches: DashMap::new(),
            retention,
            finished_seq: AtomicU64::new(0),
        }
    }

    /// Register a new batch in the PROCESSING state.
    pub fn start(&self, batch_id: &str, total: usize) -> BatchStatus {
        self.prune();
        let status = BatchStatus::processing(
            batch_id.to_string(),
            total,
            format_utc_rfc3339(chrono::Utc::now()),
        );
        self.batches.insert(
            batch_id.to_string(),
            TrackedBatch {
                status: status.clone(),
                finished: None,
            },
        );
        status
    }

    pub fn get(&self, batch_id: &str) -> Option<BatchStatus> {
        self.batches.get(batch_id).map(|b| b.status.clone())
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Drop the oldest finished batches beyond the retention limit.
    fn prune(&self) {
        let mut finished: Vec<(u64, String)> = self
            .batches
            .iter()
            .filter_map(|b| b.finished.map(|seq| (seq, b.key().clone())))
            .collect();
        if finished.len() <= self.retention {
            return;
        }

        finished.sort_unstable();
        let excess = finished.len() - self.retention;
        for (_, batch_id) in finished.into_iter().take(excess) {
            self.batches.remove(&batch_id);
        }
        tracing::debug!(evicted = excess, "Pruned finished batches");
    }

    fn update(&self, batch_id: &str, progress: BatchProgress, error: Option<&str>) {
        if let Some(mut batch) = self.batches.get_mut(batch_id) {
            let status = &mut batch.status;
            status.processed = progress.processed;
            status.successful = progress.successful;
            status.failed = progress.failed;
            status.percentage = progress.percentage();
            if let Some(error) = error {
                status.errors.push(error.to_string());
            }
        }
    }

    fn complete(&self, batch_id: &str, result: &BatchProcessingResult) {
        let seq = self.finished_seq.fetch_add(1, Ordering::Relaxed);
        if let Some(mut batch) = self.batches.get_mut(batch_id) {
            batch.finished = Some(seq);
            let status = &mut batch.status;
            status.status = if result.completed {
                BatchState::Completed
            } else {
                BatchState::Failed
            };
            status.processed = result.processed_entries;
            status.successful = result.successful_entries;
            status.failed = result.failed_entries;
            status.errors = result.errors.clone();
            status.percentage = if result.total_entries == 0 {
                100.0
            } else {
                result.processed_entries as f64 * 100.0 / result.total_entries as f64
            };
            status.completed_at = Some(format_utc_rfc3339(chrono::Utc::now()));
        }
    }

    /// Mark a batch FAILED when its worker stopped before completing.
    pub fn fail(&self, batch_id: &str, error: &str) {
        let seq = self.finished_seq.fetch_add(1, Ordering::Relaxed);
        if let Some(mut batch) = self.batches.get_mut(batch_id) {
            if batch.finished.is_some() {
                return;
            }
            batch.finished = Some(seq);
            batch.status.status = BatchState::Failed;
            batch.status.errors.push(error.to_string());
            batch.status.completed_at = Some(format_utc_rfc3339(chrono::Utc::now()));
        }
    }

    /// Callback that records progress for one batch.
    pub fn progress_for(self: &Arc<Self>, batch_id: &str) -> TrackedProgress {
        TrackedProgress {
            tracker: self.clone(),
            batch_id: batch_id.to_string(),
        }
    }
}

/// [`ProgressCallback`] writing into a [`BatchTracker`].
pub struct TrackedProgress {
    tracker: Arc<BatchTracker>,
    batch_id: String,
}

impl ProgressCallback for TrackedProgress {
    fn on_progress(&self, progress: BatchProgress, error: Option<&str>) {
        tracing::debug!(
            batch_id = %self.batch_id,
            processed = progress.processed,
            total = progress.total,
            "Batch progress"
        );
        self.tracker.update(&self.batch_id, progress, error);
    }

    fn on_complete(&self, result: &BatchProcessingResult) {
        self.tracker.complete(&self.batch_id, result);
    }
}
