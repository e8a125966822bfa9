// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Service counters (lock-free atomics), rendered for Prometheus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    /// Feedback entries processed and stored
    pub feedback_processed: AtomicU64,
    /// Enhancement calls made against the generative API
    pub ai_enhancement: AtomicU64,
    /// Sentiment analyses performed
    pub sentiment_analysis: AtomicU64,

    // --- Enhancement latency (μs) ---
    pub ai_enhancement_duration_us_sum: AtomicU64,
    pub ai_enhancement_duration_us_max: AtomicU64,
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            feedback_processed: AtomicU64::new(0),
            ai_enhancement: AtomicU64::new(0),
            sentiment_analysis: AtomicU64::new(0),
            ai_enhancement_duration_us_sum: AtomicU64::new(0),
            ai_enhancement_duration_us_max: AtomicU64::new(0),
        }
    }

    pub fn record_feedback_processed(&self) {
        self.feedback_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sentiment_analysis(&self) {
        self.sentiment_analysis.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_enhancement(&self, start: Instant) {
        let us = start.elapsed().as_micros() as u64;
        self.ai_enhancement.fetch_add(1, Ordering::Relaxed);
        self.ai_enhancement_duration_us_sum
            .fetch_add(us, Ordering::Relaxed);
        self.ai_enhancement_duration_us_max
            .fetch_max(us, Ordering::Relaxed);
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let processed = self.feedback_processed.load(Ordering::Relaxed);
        let enhancements = self.ai_enhancement.load(Ordering::Relaxed);
        let analyses = self.sentiment_analysis.load(Ordering::Relaxed);
        let dur_sum = self.ai_enhancement_duration_us_sum.load(Ordering::Relaxed);
        let dur_max = self.ai_enhancement_duration_us_max.swap(0, Ordering::Relaxed);

        let dur_sum_s = dur_sum as f64 / 1_000_000.0;
        let dur_max_s = dur_max as f64 / 1_000_000.0;

        format!(
            "\
# HELP feedback_processed_total Number of feedback entries processed.\n\
# TYPE feedback_processed_total counter\n\
feedback_processed_total {processed}\n\
# HELP ai_enhancement_total Number of AI enhancement operations.\n\
# TYPE ai_enhancement_total counter\n\
ai_enhancement_total {enhancements}\n\
# HELP ai_enhancement_duration_seconds_sum Time taken for AI enhancement operations.\n\
# TYPE ai_enhancement_duration_seconds_sum counter\n\
ai_enhancement_duration_seconds_sum {dur_sum_s:.6}\n\
# HELP ai_enhancement_duration_seconds_max Slowest enhancement since last scrape.\n\
# TYPE ai_enhancement_duration_seconds_max gauge\n\
ai_enhancement_duration_seconds_max {dur_max_s:.6}\n\
# HELP sentiment_analysis_total Number of sentiment analysis operations.\n\
# TYPE sentiment_analysis_total counter\n\
sentiment_analysis_total {analyses}\n"
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
