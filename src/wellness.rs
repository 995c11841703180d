//! Wellness views: journal, daily check-in, emergency profile, tips

mod checkin;
mod emergency;
mod journal;
pub mod tips;

pub use checkin::{CheckIn, Rating, MAX_RATING, MIN_RATING};
pub use emergency::{ContactRequest, EmergencyProfile, EMERGENCY_NOTICE};
pub use journal::JournalEntry;

use crate::mood::MoodTag;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WellnessError {
    #[error("Journal entry is empty")]
    EmptyJournalEntry,
    #[error("Rating {0} is outside 1-10")]
    RatingOutOfRange(u8),
    #[error("Please add an emergency contact first")]
    NoEmergencyContact,
}

/// Top-level tabs of the companion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    SymptomChecker,
    CheckIn,
    Journal,
    Tips,
    Emergency,
}

impl View {
    pub const ALL: [View; 5] = [
        View::SymptomChecker,
        View::CheckIn,
        View::Journal,
        View::Tips,
        View::Emergency,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::SymptomChecker => "Symptom Checker",
            View::CheckIn => "Health Check-In",
            View::Journal => "Journal",
            View::Tips => "Health Tips",
            View::Emergency => "Emergency",
        }
    }

    /// Avatar mood before any user input tints it
    pub fn default_mood(self) -> MoodTag {
        match self {
            View::Tips => MoodTag::Happy,
            View::Emergency => MoodTag::Alert,
            View::SymptomChecker | View::CheckIn | View::Journal => MoodTag::Neutral,
        }
    }
}
