// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feedback enhancement service.
//!
//! Handles:
//! - Enhancing entries with a category and actionable insight
//! - Caching the enhanced view of all stored feedback
//! - Building dashboard summaries
//! - Persisting processed feedback

use crate::db::FeedbackStore;
use crate::error::{AppError, Result};
use crate::metrics::METRICS;
use crate::models::{EnhancedFeedback, FeedbackEntry, FeedbackSummary, Sentiment};
use crate::services::GeminiClient;
use futures_util::{stream, StreamExt};
use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const NO_ACTION: &str = "No specific action recommended.";
pub const ERROR_CATEGORY: &str = "Error in processing";

static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""category"\s*:\s*"([^"]+)""#).expect("category pattern is valid")
});
static INSIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""actionableInsight"\s*:\s*"([^"]+)""#).expect("insight pattern is valid")
});

/// Enhances, caches and persists feedback.
pub struct FeedbackService {
    store: FeedbackStore,
    gemini: GeminiClient,
    concurrency: usize,
    cache: RwLock<Option<Arc<Vec<EnhancedFeedback>>>>,
    /// Serialises cache fills so concurrent misses enhance once
    fill_lock: Mutex<()>,
    /// Bumped on every invalidation; a fill started before a bump is discarded
    generation: AtomicU64,
}

impl FeedbackService {
    pub fn new(store: FeedbackStore, gemini: GeminiClient, concurrency: usize) -> Self {
        Self {
            store,
            gemini,
            concurrency: concurrency.max(1),
            cache: RwLock::new(None),
            fill_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &FeedbackStore {
        &self.store
    }

    pub fn gemini(&self) -> &GeminiClient {
        &self.gemini
    }

    /// All stored feedback, enhanced. Served from cache when warm.
    pub async fn enhanced_feedback(&self) -> Result<Arc<Vec<EnhancedFeedback>>> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let _fill = self.fill_lock.lock().await;
        // Another caller may have filled the cache while we waited
        if let Some(cached) = self.cache.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let generation = self.generation.load(Ordering::Acquire);
        let entries = self.store.find_all().await?;
        tracing::info!(count = entries.len(), "Enhancing stored feedback");

        let enhanced: Vec<EnhancedFeedback> = stream::iter(entries)
            .map(|entry| self.enhance(entry))
            .buffered(self.concurrency)
            .collect()
            .await;
        let enhanced = Arc::new(enhanced);

        let mut cache = self.cache.write().await;
        if self.generation.load(Ordering::Acquire) == generation {
            *cache = Some(enhanced.clone());
        } else {
            tracing::debug!("Cache invalidated during fill; not storing result");
        }

        Ok(enhanced)
    }

    /// Enhance one entry. Never fails: API errors become an error category.
    pub async fn enhance(&self, entry: FeedbackEntry) -> EnhancedFeedback {
        let start = Instant::now();
        let prompt = build_prompt(&entry);
        let feedback_id = entry.id;
        let mut enhanced = EnhancedFeedback::new(entry);

        match self.gemini.generate_content(&prompt).await {
            Ok(response) => {
                let (category, insight) = parse_enhancement(&response);
                enhanced.category = category.unwrap_or_else(|| UNCATEGORIZED.to_string());
                enhanced.actionable_insight = insight.unwrap_or_else(|| NO_ACTION.to_string());
            }
            Err(e) => {
                tracing::warn!(feedback_id, error = %e, "Failed to enhance feedback");
                enhanced.category = ERROR_CATEGORY.to_string();
                enhanced.actionable_insight =
                    format!("Could not generate insight due to API error: {}", e);
            }
        }

        METRICS.record_enhancement(start);
        enhanced.enhanced_at = chrono::Utc::now();
        enhanced
    }

    /// Dashboard summary over all enhanced feedback.
    pub async fn summary(&self) -> Result<FeedbackSummary> {
        let all = self.enhanced_feedback().await?;
        Ok(FeedbackSummary::from_feedback(&all))
    }

    /// Persist the entry behind an enhanced record and invalidate the cache.
    pub async fn save_enhanced(&self, enhanced: &EnhancedFeedback) -> Result<FeedbackEntry> {
        let saved = self
            .store
            .save(enhanced.entry.clone(), Some(enhanced.entry.id))
            .await?;
        self.clear_cache().await;
        METRICS.record_feedback_processed();
        tracing::info!(feedback_id = saved.id, "Saved enhanced feedback");
        Ok(saved)
    }

    pub async fn clear_cache(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        *self.cache.write().await = None;
    }

    /// Enhanced view of a single stored entry.
    pub async fn find_by_id(&self, id: u64) -> Result<EnhancedFeedback> {
        self.enhanced_feedback()
            .await?
            .iter()
            .find(|f| f.entry.id == id)
            .cloned()
            .ok_or(AppError::NotFound(id))
    }

    pub async fn delete_by_id(&self, id: u64) -> Result<()> {
        if !self.store.delete_by_id(id).await? {
            return Err(AppError::NotFound(id));
        }
        self.clear_cache().await;
        Ok(())
    }

    /// Enhanced feedback filtered by department and/or sentiment.
    pub async fn filtered(
        &self,
        department: Option<&str>,
        sentiment: Option<Sentiment>,
    ) -> Result<Vec<EnhancedFeedback>> {
        let all = self.enhanced_feedback().await?;
        Ok(all
            .iter()
            .filter(|f| department.is_none_or(|d| f.entry.department.eq_ignore_ascii_case(d)))
            .filter(|f| sentiment.is_none_or(|s| f.entry.sentiment == Some(s)))
            .cloned()
            .collect())
    }

    pub async fn find_by_department(&self, department: &str) -> Result<Vec<EnhancedFeedback>> {
        self.filtered(Some(department), None).await
    }

    pub async fn find_by_sentiment(&self, sentiment: Sentiment) -> Result<Vec<EnhancedFeedback>> {
        self.filtered(None, Some(sentiment)).await
    }
}

/// Prompt asking for a category and an actionable insight as JSON.
pub fn build_prompt(entry: &FeedbackEntry) -> String {
    let sentiment = entry.sentiment.map(|s| s.label()).unwrap_or("Unknown");
    format!(
        "You are an AI assistant specialized in customer feedback analysis.
Analyze the following customer feedback and:
1. Categorize the feedback into one of these categories: Product Quality, Customer Service, Store Experience, Website/App, Delivery, Price/Value, Inventory/Stock, or Other.
2. Provide a specific actionable insight or recommendation based on the feedback.

Format your response as JSON with two fields: \"category\" and \"actionableInsight\".
Keep your response concise but insightful.

Customer Feedback:
Comment: {}
Department: {}
Sentiment: {}

Provide the category and actionable insight as JSON:
",
        entry.comment, entry.department, sentiment
    )
}

/// Pull `category` and `actionableInsight` out of a model response.
///
/// Tries the outermost `{...}` as JSON first (this also covers fenced code
/// blocks), then falls back to pattern matching.
pub fn parse_enhancement(response: &str) -> (Option<String>, Option<String>) {
    let text = response.trim();

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text[start..=end]) {
                let get = |key: &str| {
                    value
                        .get(key)
                        .and_then(|v| v.as_str())
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                };
                let category = get("category");
                let insight = get("actionableInsight");
                if category.is_some() || insight.is_some() {
                    return (category, insight);
                }
            }
        }
    }

    let capture = |re: &Regex| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };
    (capture(&CATEGORY_RE), capture(&INSIGHT_RE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;
    use chrono::NaiveDate;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;
    use std::time::Duration;

    fn service(dir: &tempfile::TempDir) -> FeedbackService {
        let store = FeedbackStore::new(dir.path().join("feedback.txt"));
        let gemini = GeminiClient::new(&GeminiConfig::default()).unwrap();
        FeedbackService::new(store, gemini, 2)
    }

    fn service_with_api(dir: &tempfile::TempDir, server: &MockServer) -> FeedbackService {
        let store = FeedbackStore::new(dir.path().join("feedback.txt"));
        let gemini = GeminiClient::new(&GeminiConfig {
            api_key: Some("test-key".into()),
            api_url: server.url("/generate"),
            timeout_secs: 5,
        })
        .unwrap();
        FeedbackService::new(store, gemini, 2)
    }

    async fn mock_enhancement(server: &MockServer, delay: Duration) -> httpmock::Mock<'_> {
        let text = r#"{"category": "Delivery", "actionableInsight": "Ship faster"}"#;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/generate");
                then.status(200).delay(delay).json_body(json!({
                    "candidates": [{ "content": { "parts": [{ "text": text }] } }]
                }));
            })
            .await
    }

    fn entry(id: u64, department: &str, sentiment: Sentiment) -> FeedbackEntry {
        FeedbackEntry {
            id,
            customer: "Alice".into(),
            department: department.into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            comment: "Bread was stale".into(),
            sentiment: Some(sentiment),
        }
    }

    #[tokio::test]
    async fn test_cache_is_reused_until_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);
        service
            .store()
            .save(entry(1, "Bakery", Sentiment::Negative), Some(1))
            .await
            .unwrap();

        let first = service.enhanced_feedback().await.unwrap();
        let second = service.enhanced_feedback().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].category, ERROR_CATEGORY);

        service.clear_cache().await;
        let third = service.enhanced_feedback().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[tokio::test]
    async fn test_concurrent_misses_enhance_once() {
        let server = MockServer::start_async().await;
        let mock = mock_enhancement(&server, Duration::from_millis(50)).await;
        let dir = tempfile::tempdir().unwrap();
        let service = service_with_api(&dir, &server);
        for id in 1..=3 {
            service
                .store()
                .save(entry(id, "Bakery", Sentiment::Negative), Some(id))
                .await
                .unwrap();
        }

        let (first, second) =
            tokio::join!(service.enhanced_feedback(), service.enhanced_feedback());
        let (first, second) = (first.unwrap(), second.unwrap());

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|f| f.category == "Delivery"));
        assert_eq!(mock.hits_async().await, 3);
    }

    #[tokio::test]
    async fn test_fill_interrupted_by_clear_is_not_cached() {
        let server = MockServer::start_async().await;
        let mock = mock_enhancement(&server, Duration::from_millis(300)).await;
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(service_with_api(&dir, &server));
        service
            .store()
            .save(entry(1, "Deli", Sentiment::Positive), Some(1))
            .await
            .unwrap();

        let fill = tokio::spawn({
            let service = service.clone();
            async move { service.enhanced_feedback().await }
        });

        // Wait until the fill is waiting on the API
        for _ in 0..200 {
            if mock.hits_async().await > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(mock.hits_async().await, 1);
        service.clear_cache().await;

        let stale = fill.await.unwrap().unwrap();
        assert_eq!(stale.len(), 1);
        assert!(service.cache.read().await.is_none());

        // The next read fills again
        let fresh = service.enhanced_feedback().await.unwrap();
        assert!(!Arc::ptr_eq(&stale, &fresh));
        assert_eq!(mock.hits_async().await, 2);
        assert!(service.cache.read().await.is_some());
    }

    #[tokio::test]
    async fn test_save_and_delete_invalidate_cache() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);
        assert!(service.enhanced_feedback().await.unwrap().is_empty());

        let enhanced = service.enhance(entry(5, "Deli", Sentiment::Positive)).await;
        service.save_enhanced(&enhanced).await.unwrap();
        assert_eq!(service.enhanced_feedback().await.unwrap().len(), 1);
        assert_eq!(service.find_by_id(5).await.unwrap().entry.department, "Deli");

        service.delete_by_id(5).await.unwrap();
        assert!(service.enhanced_feedback().await.unwrap().is_empty());
        assert!(matches!(
            service.delete_by_id(5).await,
            Err(AppError::NotFound(5))
        ));
    }

    #[tokio::test]
    async fn test_filters() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(&dir);
        for (id, department, sentiment) in [
            (1, "Bakery", Sentiment::Negative),
            (2, "bakery", Sentiment::Positive),
            (3, "Garden", Sentiment::Positive),
        ] {
            service
                .store()
                .save(entry(id, department, sentiment), Some(id))
                .await
                .unwrap();
        }

        assert_eq!(service.find_by_department("BAKERY").await.unwrap().len(), 2);
        assert_eq!(
            service
                .find_by_sentiment(Sentiment::Positive)
                .await
                .unwrap()
                .len(),
            2
        );
        let both = service
            .filtered(Some("garden"), Some(Sentiment::Positive))
            .await
            .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].entry.id, 3);
    }

    #[test]
    fn test_parse_plain_json() {
        let (category, insight) = parse_enhancement(
            r#"{"category": "Delivery", "actionableInsight": "Offer tracking numbers."}"#,
        );
        assert_eq!(category.as_deref(), Some("Delivery"));
        assert_eq!(insight.as_deref(), Some("Offer tracking numbers."));
    }

    #[test]
    fn test_parse_fenced_json() {
        let response = "```json\n{\n  \"category\": \"Price/Value\",\n  \"actionableInsight\": \"Review \\\"premium\\\" pricing.\"\n}\n```";
        let (category, insight) = parse_enhancement(response);
        assert_eq!(category.as_deref(), Some("Price/Value"));
        assert_eq!(insight.as_deref(), Some("Review \"premium\" pricing."));
    }

    #[test]
    fn test_parse_falls_back_to_patterns() {
        // Not valid JSON (trailing comma, prose around it)
        let response = r#"Sure! "category": "Customer Service", "actionableInsight": "Train staff", and more"#;
        let (category, insight) = parse_enhancement(response);
        assert_eq!(category.as_deref(), Some("Customer Service"));
        assert_eq!(insight.as_deref(), Some("Train staff"));
    }

    #[test]
    fn test_parse_nothing_found() {
        let (category, insight) = parse_enhancement("No response from Gemini");
        assert_eq!(category, None);
        assert_eq!(insight, None);
    }

    #[test]
    fn test_prompt_mentions_entry_fields() {
        let entry = FeedbackEntry {
            id: 1,
            customer: "Alice".into(),
            department: "Bakery".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            comment: "Bread was stale".into(),
            sentiment: Some(Sentiment::Negative),
        };
        let prompt = build_prompt(&entry);
        assert!(prompt.contains("Comment: Bread was stale"));
        assert!(prompt.contains("Department: Bakery"));
        assert!(prompt.contains("Sentiment: Negative"));
        assert!(prompt.contains("Inventory/Stock"));
    }
}
