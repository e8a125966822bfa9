// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;
use std::path::PathBuf;

/// Default location of the feedback file.
pub const DEFAULT_FEEDBACK_FILE: &str = "data/sentiment_feedback_output.txt";

/// Default generative language endpoint.
pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Path of the text file holding feedback entries
    pub feedback_file_path: PathBuf,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Generative API settings
    pub gemini: GeminiConfig,
    /// Maximum number of enhancement calls in flight at once
    pub enhancement_concurrency: usize,
}

/// Settings for the generative language API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key; enhancement degrades gracefully when absent
    pub api_key: Option<String>,
    /// Full `generateContent` URL
    pub api_url: String,
    /// Connect/request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_GEMINI_API_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = parse_var("PORT", 8080)?;
        let timeout_secs = parse_var("GEMINI_API_TIMEOUT", 30)?;
        let enhancement_concurrency = parse_var("ENHANCEMENT_CONCURRENCY", 8usize)?;
        if enhancement_concurrency == 0 {
            return Err(ConfigError::Invalid {
                name: "ENHANCEMENT_CONCURRENCY",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            port,
            feedback_file_path: env::var("FEEDBACK_FILE_PATH")
                .unwrap_or_else(|_| DEFAULT_FEEDBACK_FILE.to_string())
                .into(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            gemini: GeminiConfig {
                api_key: env::var("GEMINI_API_KEY")
                    .ok()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty()),
                api_url: env::var("GEMINI_API_URL")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string()),
                timeout_secs,
            },
            enhancement_concurrency,
        })
    }

    /// Deterministic configuration for tests.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            feedback_file_path: PathBuf::from("target/test-feedback.txt"),
            frontend_url: "http://localhost:8080".to_string(),
            gemini: GeminiConfig {
                api_key: None,
                api_url: "http://127.0.0.1:9/generateContent".to_string(),
                timeout_secs: 2,
            },
            enhancement_concurrency: 4,
        }
    }
}

/// Parse an optional environment variable, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw.clone(),
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
