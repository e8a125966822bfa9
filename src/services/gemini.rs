// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generative language API client (`generateContent`).

use crate::config::GeminiConfig;
use crate::error::AppError;
use serde::Deserialize;
use std::time::Duration;

/// Returned when the API answers without any candidate text.
pub const NO_RESPONSE_TEXT: &str = "No response from Gemini";

const TEMPERATURE: f64 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 1024;
const CONNECTION_TEST_PROMPT: &str = "Say 'Hello, World!' if you can hear me.";

/// Client for the generative language API.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Create a client with connect and request timeouts from config.
    pub fn new(config: &GeminiConfig) -> Result<Self, AppError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client error: {}", e)))?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send a prompt and return the first candidate's text.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, AppError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AppError::ExternalApi {
                status: 503,
                message: "Gemini API key is not configured".to_string(),
            });
        };

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "maxOutputTokens": MAX_OUTPUT_TOKENS
            }
        });

        let response = self
            .http
            .post(&self.api_url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error calling Gemini API");
                AppError::ExternalApi {
                    status: AppError::GATEWAY_STATUS,
                    message: format!("Failed to call Gemini API: {}", e),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "Gemini API call failed"
            );
            return Err(AppError::ExternalApi {
                status: status.as_u16(),
                message: format!("Gemini API returned error: {}", status.as_u16()),
            });
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(|e| AppError::ExternalApi {
                status: AppError::GATEWAY_STATUS,
                message: format!("JSON parse error: {}", e),
            })?;

        match parsed.first_text() {
            Some(text) => Ok(text),
            None => {
                tracing::warn!("No valid response from Gemini API");
                Ok(NO_RESPONSE_TEXT.to_string())
            }
        }
    }

    /// Round-trip a trivial prompt to check connectivity.
    pub async fn test_connection(&self) -> bool {
        match self.generate_content(CONNECTION_TEST_PROMPT).await {
            Ok(text) => !text.starts_with("Error"),
            Err(e) => {
                tracing::error!(error = %e, "Gemini API connection test failed");
                false
            }
        }
    }
}

/// `generateContent` response (only the fields we read).
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}
