// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Five-level sentiment label.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Sentiment of a sentence or a whole comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sentiment {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

impl Sentiment {
    pub const ALL: [Sentiment; 5] = [
        Sentiment::VeryNegative,
        Sentiment::Negative,
        Sentiment::Neutral,
        Sentiment::Positive,
        Sentiment::VeryPositive,
    ];

    /// Human-readable label, as written to the feedback file.
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::VeryNegative => "Very negative",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Positive => "Positive",
            Sentiment::VeryPositive => "Very positive",
        }
    }

    /// Bucket a normalised compound score in `[-1, 1]`.
    pub fn from_score(score: f64) -> Self {
        if score <= -0.6 {
            Sentiment::VeryNegative
        } else if score < -0.05 {
            Sentiment::Negative
        } else if score <= 0.05 {
            Sentiment::Neutral
        } else if score < 0.6 {
            Sentiment::Positive
        } else {
            Sentiment::VeryPositive
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown sentiment label: {0}")]
pub struct UnknownSentiment(pub String);

impl FromStr for Sentiment {
    type Err = UnknownSentiment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "verynegative" => Ok(Sentiment::VeryNegative),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            "positive" => Ok(Sentiment::Positive),
            "verypositive" => Ok(Sentiment::VeryPositive),
            _ => Err(UnknownSentiment(s.to_string())),
        }
    }
}

impl Serialize for Sentiment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_lenient_about_case_and_separators() {
        assert_eq!("NEUTRAL".parse::<Sentiment>().unwrap(), Sentiment::Neutral);
        assert_eq!(
            "Very positive".parse::<Sentiment>().unwrap(),
            Sentiment::VeryPositive
        );
        assert_eq!(
            "very_negative".parse::<Sentiment>().unwrap(),
            Sentiment::VeryNegative
        );
        assert!("ecstatic".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_label_round_trips_through_parse() {
        for s in Sentiment::ALL {
            assert_eq!(s.label().parse::<Sentiment>().unwrap(), s);
        }
    }

    #[test]
    fn test_score_buckets() {
        assert_eq!(Sentiment::from_score(-0.9), Sentiment::VeryNegative);
        assert_eq!(Sentiment::from_score(-0.3), Sentiment::Negative);
        assert_eq!(Sentiment::from_score(0.0), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(0.05), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(0.3), Sentiment::Positive);
        assert_eq!(Sentiment::from_score(0.6), Sentiment::VeryPositive);
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&Sentiment::VeryPositive).unwrap();
        assert_eq!(json, "\"Very positive\"");
    }
}
