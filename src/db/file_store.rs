// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Text-file feedback storage.
//!
//! Entries live in a human-readable report:
//!
//! ```text
//! # Customer Feedback Analysis
//!
//! ## Detailed Feedback Entries
//!
//! Feedback #1
//! Customer: Alice
//! Department: Electronics
//! Date: 2024-01-15
//! Comment: Great selection of TVs.
//! Sentiment: Positive
//! ```
//!
//! Every write rewrites the whole file. A reader/writer lock serialises
//! writers against readers inside this process.

use crate::error::AppError;
use crate::models::{FeedbackEntry, Sentiment};
use crate::time_utils::{parse_date, today, DATE_FORMAT};
use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

const REPORT_TITLE: &str = "# Customer Feedback Analysis";
const ENTRIES_MARKER: &str = "## Detailed Feedback Entries";
const ENTRY_HEADER: &str = "Feedback #";

/// Feedback repository backed by a single text file.
#[derive(Clone)]
pub struct FeedbackStore {
    path: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl FeedbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(RwLock::new(())),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every stored entry, in file order.
    pub async fn find_all(&self) -> Result<Vec<FeedbackEntry>, AppError> {
        let _guard = self.lock.read().await;
        self.read_entries().await
    }

    pub async fn find_by_id(&self, id: u64) -> Result<Option<FeedbackEntry>, AppError> {
        let _guard = self.lock.read().await;
        Ok(self.read_entries().await?.into_iter().find(|e| e.id == id))
    }

    /// Entries for a department (case-insensitive).
    pub async fn find_by_department(
        &self,
        department: &str,
    ) -> Result<Vec<FeedbackEntry>, AppError> {
        let _guard = self.lock.read().await;
        Ok(self
            .read_entries()
            .await?
            .into_iter()
            .filter(|e| e.department.eq_ignore_ascii_case(department))
            .collect())
    }

    pub async fn find_by_sentiment(
        &self,
        sentiment: Sentiment,
    ) -> Result<Vec<FeedbackEntry>, AppError> {
        let _guard = self.lock.read().await;
        Ok(self
            .read_entries()
            .await?
            .into_iter()
            .filter(|e| e.sentiment == Some(sentiment))
            .collect())
    }

    /// Insert or replace an entry.
    ///
    /// With `id == None` the entry gets `max(existing) + 1`. Otherwise any
    /// stored entry with the same ID is replaced and the new one is appended.
    pub async fn save(
        &self,
        mut entry: FeedbackEntry,
        id: Option<u64>,
    ) -> Result<FeedbackEntry, AppError> {
        let _guard = self.lock.write().await;
        let mut entries = self.read_entries().await?;

        match id {
            None => {
                let max_id = entries.iter().map(|e| e.id).max().unwrap_or(0);
                entry.id = max_id.checked_add(1).ok_or_else(|| {
                    AppError::Storage(format!("No feedback ID available after {}", max_id))
                })?;
            }
            Some(id) => {
                entry.id = id;
                entries.retain(|e| e.id != id);
            }
        }
        entries.push(entry.clone());

        self.write_entries(&entries).await?;
        tracing::info!(feedback_id = entry.id, "Saved feedback");
        Ok(entry)
    }

    /// Remove an entry. Returns `false` if no entry had that ID.
    pub async fn delete_by_id(&self, id: u64) -> Result<bool, AppError> {
        let _guard = self.lock.write().await;
        let mut entries = self.read_entries().await?;
        let before = entries.len();
        entries.retain(|e| e.id != id);

        if entries.len() == before {
            return Ok(false);
        }

        self.write_entries(&entries).await?;
        tracing::info!(feedback_id = id, "Deleted feedback");
        Ok(true)
    }

    /// Invalid UTF-8 is replaced rather than rejected so one bad byte
    /// cannot hide every entry.
    async fn read_entries(&self) -> Result<Vec<FeedbackEntry>, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                if matches!(text, Cow::Owned(_)) {
                    tracing::warn!(
                        path = %self.path.display(),
                        "Feedback file is not valid UTF-8, replacing invalid bytes"
                    );
                }
                Ok(parse_report(&text))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "Feedback file not found");
                Ok(Vec::new())
            }
            Err(e) => Err(AppError::Storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Write to a sibling temp file, then rename over the original.
    async fn write_entries(&self, entries: &[FeedbackEntry]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, render_report(entries)).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Parse the report text into entries.
pub fn parse_report(text: &str) -> Vec<FeedbackEntry> {
    let mut entries = Vec::new();
    let mut in_entries = false;
    let mut block: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.contains(ENTRIES_MARKER) {
            in_entries = true;
            continue;
        }
        if !in_entries {
            continue;
        }

        if line.trim().is_empty() {
            if !block.is_empty() {
                entries.extend(parse_entry(&block));
                block.clear();
            }
        } else {
            block.push(line);
        }
    }

    if !block.is_empty() {
        entries.extend(parse_entry(&block));
    }

    entries
}

/// Parse one blank-line separated block. Blocks without a header are skipped.
fn parse_entry(lines: &[&str]) -> Option<FeedbackEntry> {
    let id = lines.iter().find_map(|line| {
        let rest = line.trim().strip_prefix(ENTRY_HEADER)?;
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse::<u64>().ok()
    });
    let Some(id) = id else {
        tracing::debug!(block = ?lines, "Skipping block without feedback header");
        return None;
    };

    let field = |name: &str| -> Option<String> {
        lines.iter().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            (key.trim() == name).then(|| value.trim().to_string())
        })
    };

    let date = match field("Date") {
        Some(raw) => parse_date(&raw).unwrap_or_else(|| {
            tracing::warn!(feedback_id = id, date = %raw, "Failed to parse date");
            today()
        }),
        None => today(),
    };

    let sentiment = field("Sentiment")
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| match raw.parse::<Sentiment>() {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(feedback_id = id, error = %e, "Ignoring sentiment");
                None
            }
        });

    Some(FeedbackEntry {
        id,
        customer: field("Customer").unwrap_or_default(),
        department: field("Department").unwrap_or_default(),
        date,
        comment: field("Comment").unwrap_or_default(),
        sentiment,
    })
}

/// Render entries in the report format.
pub fn render_report(entries: &[FeedbackEntry]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}\n\n{}\n\n", REPORT_TITLE, ENTRIES_MARKER);

    for entry in entries {
        let _ = writeln!(out, "{}{}", ENTRY_HEADER, entry.id);
        let _ = writeln!(out, "Customer: {}", single_line(&entry.customer));
        let _ = writeln!(out, "Department: {}", single_line(&entry.department));
        let _ = writeln!(out, "Date: {}", entry.date.format(DATE_FORMAT));
        let _ = writeln!(out, "Comment: {}", single_line(&entry.comment));
        let _ = writeln!(
            out,
            "Sentiment: {}",
            entry.sentiment.map(|s| s.label()).unwrap_or("")
        );
        out.push('\n');
    }

    out
}

/// Values are stored one per line; fold embedded newlines into spaces.
fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
