// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard aggregates over enhanced feedback.

use serde::Serialize;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{EnhancedFeedback, FeedbackResponse};

/// Number of entries shown in the "recent feedback" list.
pub const RECENT_FEEDBACK_LIMIT: usize = 5;

/// Key used for entries whose sentiment has not been analysed.
pub const UNKNOWN_SENTIMENT: &str = "Unknown";

/// Aggregated counts over all feedback.
#[derive(Debug, Clone, Default)]
pub struct FeedbackSummary {
    pub total_feedback: usize,
    /// Entry count per sentiment label
    pub sentiment_counts: BTreeMap<String, u32>,
    /// Entry count per enhancement category
    pub category_counts: BTreeMap<String, u32>,
    /// Entry count per department
    pub department_counts: BTreeMap<String, u32>,
    /// Most recent entries (highest IDs first)
    pub recent_feedback: Vec<EnhancedFeedback>,
}

impl FeedbackSummary {
    /// Build the summary from a full list of enhanced entries.
    pub fn from_feedback(all: &[EnhancedFeedback]) -> Self {
        let mut summary = Self {
            total_feedback: all.len(),
            ..Self::default()
        };

        for feedback in all {
            let sentiment = feedback
                .entry
                .sentiment
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| UNKNOWN_SENTIMENT.to_string());
            *summary.sentiment_counts.entry(sentiment).or_insert(0) += 1;
            *summary
                .category_counts
                .entry(feedback.category.clone())
                .or_insert(0) += 1;
            *summary
                .department_counts
                .entry(feedback.entry.department.clone())
                .or_insert(0) += 1;
        }

        let mut recent: Vec<EnhancedFeedback> = all.to_vec();
        recent.sort_by(|a, b| b.entry.id.cmp(&a.entry.id));
        recent.truncate(RECENT_FEEDBACK_LIMIT);
        summary.recent_feedback = recent;

        summary
    }
}

/// Summary as returned by the JSON API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FeedbackSummaryDto {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_feedback: usize,
    pub sentiment_counts: BTreeMap<String, u32>,
    pub category_counts: BTreeMap<String, u32>,
    pub department_counts: BTreeMap<String, u32>,
    pub recent_feedback: Vec<FeedbackResponse>,
}

impl From<FeedbackSummary> for FeedbackSummaryDto {
    fn from(summary: FeedbackSummary) -> Self {
        Self {
            total_feedback: summary.total_feedback,
            sentiment_counts: summary.sentiment_counts,
            category_counts: summary.category_counts,
            department_counts: summary.department_counts,
            recent_feedback: summary
                .recent_feedback
                .into_iter()
                .map(FeedbackResponse::from)
                .collect(),
        }
    }
}
