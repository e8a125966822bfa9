// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Feedback records, enhanced records and their API shapes.

use crate::models::Sentiment;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A stored customer feedback entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    /// Unique entry ID (also the `Feedback #<id>` header in the file)
    pub id: u64,
    pub customer: String,
    /// Store department the feedback is about
    pub department: String,
    /// Day the feedback was received
    pub date: NaiveDate,
    pub comment: String,
    /// Set once sentiment analysis has run
    pub sentiment: Option<Sentiment>,
}

impl FeedbackEntry {
    /// Build a new, not yet analysed entry from a submitted request.
    pub fn from_request(id: u64, request: FeedbackRequest, date: NaiveDate) -> Self {
        Self {
            id,
            customer: request.customer.trim().to_string(),
            department: request.department.trim().to_string(),
            date,
            comment: request.comment.trim().to_string(),
            sentiment: None,
        }
    }
}

/// A feedback entry enriched with a category and an actionable insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedFeedback {
    #[serde(flatten)]
    pub entry: FeedbackEntry,
    pub category: String,
    pub actionable_insight: String,
    pub enhanced_at: DateTime<Utc>,
}

impl EnhancedFeedback {
    /// Wrap an entry; category and insight are filled in by the caller.
    pub fn new(entry: FeedbackEntry) -> Self {
        Self {
            entry,
            category: String::new(),
            actionable_insight: String::new(),
            enhanced_at: Utc::now(),
        }
    }
}

/// Submitted feedback (JSON body or HTML form).
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct FeedbackRequest {
    #[validate(
        custom(function = "not_blank", message = "Customer name is required"),
        length(
            min = 1,
            max = 100,
            message = "Customer name must be between 1 and 100 characters"
        )
    )]
    #[serde(default, deserialize_with = "null_as_empty")]
    pub customer: String,

    #[validate(
        custom(function = "not_blank", message = "Department is required"),
        length(
            min = 1,
            max = 100,
            message = "Department must be between 1 and 100 characters"
        )
    )]
    #[serde(default, deserialize_with = "null_as_empty")]
    pub department: String,

    #[validate(
        custom(function = "not_blank", message = "Comment is required"),
        length(
            min = 1,
            max = 5000,
            message = "Comment must be between 1 and 5000 characters"
        )
    )]
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comment: String,
}

/// Treat an explicit `null` like a missing field so it reaches validation.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reject values that are empty or whitespace only.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Feedback as returned by the JSON API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FeedbackResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub customer: String,
    pub department: String,
    pub date: NaiveDate,
    pub comment: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub sentiment: Option<Sentiment>,
    pub category: Option<String>,
    pub actionable_insight: Option<String>,
    pub enhanced_at: Option<String>,
}

impl From<FeedbackEntry> for FeedbackResponse {
    fn from(entry: FeedbackEntry) -> Self {
        Self {
            id: entry.id,
            customer: entry.customer,
            department: entry.department,
            date: entry.date,
            comment: entry.comment,
            sentiment: entry.sentiment,
            category: None,
            actionable_insight: None,
            enhanced_at: None,
        }
    }
}

impl From<EnhancedFeedback> for FeedbackResponse {
    fn from(enhanced: EnhancedFeedback) -> Self {
        Self {
            category: Some(enhanced.category),
            actionable_insight: Some(enhanced.actionable_insight),
            enhanced_at: Some(crate::time_utils::format_utc_rfc3339(enhanced.enhanced_at)),
            ..FeedbackResponse::from(enhanced.entry)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(customer: &str, department: &str, comment: &str) -> FeedbackRequest {
        FeedbackRequest {
            customer: customer.to_string(),
            department: department.to_string(),
            comment: comment.to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request("Alice", "Electronics", "Great TVs").validate().is_ok());
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        let errors = request("  ", "Electronics", "").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("customer"));
        assert!(fields.contains_key("comment"));
        assert!(!fields.contains_key("department"));
    }

    #[test]
    fn test_null_fields_deserialize_as_empty() {
        let request: FeedbackRequest =
            serde_json::from_str(r#"{"customer": null, "department": "Deli"}"#).unwrap();
        assert_eq!(request.customer, "");
        assert_eq!(request.comment, "");
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("customer"));
        assert!(errors.field_errors().contains_key("comment"));
    }

    #[test]
    fn test_comment_length_limit() {
        let long = "a".repeat(5001);
        let errors = request("Alice", "Grocery", &long).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("comment"));
    }

    #[test]
    fn test_entry_from_request_trims_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let entry = FeedbackEntry::from_request(7, request(" Bob ", " Bakery ", " Fresh! "), date);
        assert_eq!(entry.id, 7);
        assert_eq!(entry.customer, "Bob");
        assert_eq!(entry.department, "Bakery");
        assert_eq!(entry.comment, "Fresh!");
        assert_eq!(entry.sentiment, None);
    }

    #[test]
    fn test_plain_entry_response_leaves_enhancement_unset() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let entry = FeedbackEntry::from_request(1, request("A", "B", "C"), date);
        let response = FeedbackResponse::from(entry);
        assert_eq!(response.category, None);
        assert_eq!(response.actionable_insight, None);
        assert_eq!(response.enhanced_at, None);
    }

    #[test]
    fn test_enhanced_response_is_camel_case() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut enhanced =
            EnhancedFeedback::new(FeedbackEntry::from_request(1, request("A", "B", "C"), date));
        enhanced.category = "Delivery".to_string();
        enhanced.actionable_insight = "Ship faster".to_string();

        let json = serde_json::to_value(FeedbackResponse::from(enhanced)).unwrap();
        assert_eq!(json["actionableInsight"], "Ship faster");
        assert_eq!(json["date"], "2024-05-01");
        assert!(json["enhancedAt"].is_string());
    }
}
