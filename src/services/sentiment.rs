// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lexicon-based sentence sentiment analysis.
//!
//! Each sentence is scored from a valence lexicon with handling for
//! negation, intensifiers, contrastive "but" and exclamation marks. The
//! summed valence is normalised to `[-1, 1]` and bucketed into one of five
//! labels. A comment's label is the most common sentence label; ties go to
//! the label seen first.

use crate::error::AppError;
use crate::metrics::METRICS;
use crate::models::Sentiment;
use std::collections::HashMap;
use std::sync::Arc;

/// Normalisation constant: `score = s / sqrt(s^2 + ALPHA)`.
const ALPHA: f64 = 15.0;
/// Valence added per intensifier (subtracted per dampener).
const BOOSTER_INCREMENT: f64 = 0.293;
/// Multiplier applied to a negated word.
const NEGATION_SCALAR: f64 = -0.74;
/// Valence added per exclamation mark.
const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 3;
/// How many preceding tokens can negate or boost a word.
const LOOKBACK: usize = 3;

const LEXICON: &[(&str, f64)] = &[
    // positive
    ("affordable", 1.4),
    ("amazing", 2.8),
    ("appreciate", 1.9),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("clean", 1.7),
    ("convenient", 1.6),
    ("courteous", 1.8),
    ("delighted", 2.7),
    ("easy", 1.9),
    ("efficient", 1.8),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("fine", 0.8),
    ("fresh", 1.3),
    ("friendly", 2.2),
    ("glad", 2.0),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("helpful", 1.8),
    ("impressed", 2.1),
    ("impressive", 2.3),
    ("knowledgeable", 1.6),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("nice", 1.8),
    ("ok", 0.9),
    ("okay", 0.9),
    ("outstanding", 3.0),
    ("perfect", 2.7),
    ("pleasant", 2.3),
    ("pleased", 1.9),
    ("polite", 1.7),
    ("quick", 1.0),
    ("reasonable", 1.3),
    ("recommend", 1.5),
    ("reliable", 1.6),
    ("satisfied", 1.8),
    ("smooth", 1.2),
    ("superb", 3.1),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("wonderful", 2.7),
    // negative
    ("angry", -2.3),
    ("annoyed", -1.6),
    ("annoying", -1.7),
    ("awful", -2.0),
    ("bad", -2.5),
    ("broken", -1.6),
    ("confusing", -1.3),
    ("crowded", -1.0),
    ("damaged", -1.8),
    ("defective", -1.9),
    ("delayed", -1.3),
    ("dirty", -1.9),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("disappointment", -2.3),
    ("disaster", -3.1),
    ("disgusting", -2.4),
    ("empty", -0.8),
    ("expensive", -1.0),
    ("fail", -2.3),
    ("failed", -2.3),
    ("frustrated", -2.0),
    ("frustrating", -1.9),
    ("hate", -2.7),
    ("hated", -3.2),
    ("horrible", -2.5),
    ("ignored", -1.6),
    ("late", -1.0),
    ("lost", -1.3),
    ("mediocre", -1.0),
    ("messy", -1.5),
    ("missing", -1.2),
    ("nasty", -2.6),
    ("overpriced", -1.6),
    ("poor", -2.1),
    ("problem", -1.7),
    ("problems", -1.7),
    ("rude", -2.0),
    ("sad", -2.1),
    ("slow", -1.2),
    ("sour", -0.8),
    ("stale", -1.4),
    ("terrible", -2.5),
    ("unacceptable", -2.0),
    ("unhappy", -1.8),
    ("unhelpful", -1.9),
    ("useless", -1.8),
    ("waste", -1.8),
    ("wasted", -2.2),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];

const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOSTER_INCREMENT),
    ("completely", BOOSTER_INCREMENT),
    ("extremely", BOOSTER_INCREMENT),
    ("highly", BOOSTER_INCREMENT),
    ("incredibly", BOOSTER_INCREMENT),
    ("really", BOOSTER_INCREMENT),
    ("so", BOOSTER_INCREMENT),
    ("super", BOOSTER_INCREMENT),
    ("totally", BOOSTER_INCREMENT),
    ("truly", BOOSTER_INCREMENT),
    ("very", BOOSTER_INCREMENT),
    ("barely", -BOOSTER_INCREMENT),
    ("marginally", -BOOSTER_INCREMENT),
    ("slightly", -BOOSTER_INCREMENT),
    ("somewhat", -BOOSTER_INCREMENT),
];

const NEGATORS: &[&str] = &[
    "cannot", "hardly", "neither", "never", "no", "nobody", "none", "nor", "not", "nothing",
    "without",
];

/// Sentence-level sentiment analyzer.
#[derive(Clone)]
pub struct SentimentAnalyzer {
    lexicon: Arc<HashMap<&'static str, f64>>,
    boosters: Arc<HashMap<&'static str, f64>>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: Arc::new(LEXICON.iter().copied().collect()),
            boosters: Arc::new(BOOSTERS.iter().copied().collect()),
        }
    }

    /// Label a whole comment by majority vote over its sentences.
    pub fn analyze(&self, comment: &str) -> Result<Sentiment, AppError> {
        if comment.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Comment cannot be null or empty".to_string(),
            ));
        }
        METRICS.record_sentiment_analysis();

        let labels = self.sentence_labels(comment);
        Ok(majority_label(&labels))
    }

    /// Label of each sentence in the text, in order.
    pub fn sentence_labels(&self, text: &str) -> Vec<Sentiment> {
        split_sentences(text)
            .into_iter()
            .map(|sentence| Sentiment::from_score(self.score_sentence(sentence)))
            .collect()
    }

    /// Normalised compound score of one sentence, in `[-1, 1]`.
    pub fn score_sentence(&self, sentence: &str) -> f64 {
        let tokens = tokenize(sentence);
        let but_index = tokens.iter().rposition(|t| t == "but");
        let mut sum = 0.0;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.lexicon.get(token.as_str()) else {
                continue;
            };
            let mut valence = base;

            let window = &tokens[i.saturating_sub(LOOKBACK)..i];
            for (distance, prev) in window.iter().rev().enumerate() {
                if let Some(&boost) = self.boosters.get(prev.as_str()) {
                    // Closer modifiers weigh more
                    let scaled = boost * (1.0 - 0.05 * distance as f64);
                    valence += if valence > 0.0 { scaled } else { -scaled };
                }
            }

            if window.iter().any(|t| is_negator(t)) {
                valence *= NEGATION_SCALAR;
            }

            if let Some(b) = but_index {
                if i < b {
                    valence *= 0.5;
                } else {
                    valence *= 1.5;
                }
            }

            sum += valence;
        }

        let exclamations = sentence.matches('!').count().min(MAX_EXCLAMATIONS) as f64;
        if sum > 0.0 {
            sum += exclamations * EXCLAMATION_INCREMENT;
        } else if sum < 0.0 {
            sum -= exclamations * EXCLAMATION_INCREMENT;
        }

        normalize(sum)
    }
}

fn normalize(sum: f64) -> f64 {
    let score = sum / (sum * sum + ALPHA).sqrt();
    score.clamp(-1.0, 1.0)
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}

/// Most frequent label; ties go to the label that appeared first.
/// No sentences means neutral.
fn majority_label(labels: &[Sentiment]) -> Sentiment {
    let mut counts: Vec<(Sentiment, usize)> = Vec::new();
    for &label in labels {
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }

    let mut best: Option<(Sentiment, usize)> = None;
    for (label, n) in counts {
        if best.map_or(true, |(_, m)| n > m) {
            best = Some((label, n));
        }
    }
    best.map(|(label, _)| label).unwrap_or(Sentiment::Neutral)
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\n')
}

/// Split on runs of sentence terminators; drop fragments with no words.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, d)) = chars.peek() {
            if !is_terminator(d) {
                break;
            }
            end = j + d.len_utf8();
            chars.next();
        }
        sentences.push(&text[start..end]);
        start = end;
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .collect()
}

/// Lowercased word tokens; apostrophes are kept so "wasn't" stays whole.
fn tokenize(sentence: &str) -> Vec<String> {
    sentence
        .replace('\u{2019}', "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\'').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
