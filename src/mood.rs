//! Mood classification
//!
//! Maps free text or a pair of wellness scores to a [`MoodTag`] used to tint
//! the avatar and pick canned copy.
//!
//! The keyword tables are a placeholder policy: first substring hit wins,
//! and the positive table is always scanned before the negative one. Text
//! such as "great but anxious" therefore classifies as `Happy`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Positive keywords, scanned first
pub const POSITIVE_KEYWORDS: &[&str] = &["happy", "great", "wonderful"];

/// Negative keywords, scanned only when no positive keyword matched
pub const NEGATIVE_KEYWORDS: &[&str] = &["sad", "worried", "anxious"];

/// Mean score at or below which a check-in reads as concerned
pub const LOW_SCORE: f64 = 3.0;

/// Mean score at or above which a check-in reads as happy
pub const HIGH_SCORE: f64 = 8.0;

/// Categorical mood used to tint avatar and UI state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodTag {
    #[default]
    Neutral,
    Happy,
    Concerned,
    Alert,
}

impl MoodTag {
    pub fn as_str(self) -> &'static str {
        match self {
            MoodTag::Neutral => "neutral",
            MoodTag::Happy => "happy",
            MoodTag::Concerned => "concerned",
            MoodTag::Alert => "alert",
        }
    }

    /// Avatar border tint for this mood
    pub fn tint(self) -> &'static str {
        match self {
            MoodTag::Neutral => "gray",
            MoodTag::Happy => "green",
            MoodTag::Concerned => "yellow",
            MoodTag::Alert => "red",
        }
    }

    /// Parse a stored tag. Unknown values read as neutral.
    pub fn parse(s: &str) -> Self {
        match s {
            "happy" => MoodTag::Happy,
            "concerned" => MoodTag::Concerned,
            "alert" => MoodTag::Alert,
            _ => MoodTag::Neutral,
        }
    }
}

impl fmt::Display for MoodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify free text by keyword.
#[must_use]
pub fn classify(text: &str) -> MoodTag {
    let lowered = text.to_lowercase();

    if POSITIVE_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        return MoodTag::Happy;
    }
    if NEGATIVE_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        return MoodTag::Concerned;
    }
    MoodTag::Neutral
}

/// Classify a physical/mental score pair by its mean.
#[must_use]
pub fn classify_numeric(physical: u8, mental: u8) -> MoodTag {
    let mean = (f64::from(physical) + f64::from(mental)) / 2.0;

    if mean <= LOW_SCORE {
        MoodTag::Concerned
    } else if mean >= HIGH_SCORE {
        MoodTag::Happy
    } else {
        MoodTag::Neutral
    }
}
