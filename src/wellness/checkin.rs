//! Daily check-in: two 1-10 wellness ratings

use super::WellnessError;
use crate::mood::{classify_numeric, MoodTag};
use serde::{Deserialize, Serialize};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// Ratings at or below this are "low"
const LOW_RATING: u8 = 3;
/// Ratings at or above this are "high"
const HIGH_RATING: u8 = 8;

/// A validated 1-10 rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self, WellnessError> {
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            Ok(Self(value))
        } else {
            Err(WellnessError::RatingOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = WellnessError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub physical: Rating,
    pub mental: Rating,
}

impl CheckIn {
    pub fn new(physical: u8, mental: u8) -> Result<Self, WellnessError> {
        Ok(Self {
            physical: Rating::new(physical)?,
            mental: Rating::new(mental)?,
        })
    }

    pub fn mood(&self) -> MoodTag {
        classify_numeric(self.physical.get(), self.mental.get())
    }

    /// What the companion says about this check-in
    pub fn guidance(&self) -> &'static str {
        let physical = self.physical.get();
        let mental = self.mental.get();

        if physical <= LOW_RATING && mental <= LOW_RATING {
            "I'm concerned about how you're feeling today. Would you like to talk about it?"
        } else if physical <= LOW_RATING {
            "Your physical wellness seems low today. Remember to rest and take care of your body."
        } else if mental <= LOW_RATING {
            "Your mental wellness seems low today. Consider taking a moment for yourself."
        } else if physical >= HIGH_RATING && mental >= HIGH_RATING {
            "You're doing great today! Keep up the positive momentum!"
        } else {
            "Thank you for checking in. Remember that your health is important."
        }
    }
}

impl Default for CheckIn {
    fn default() -> Self {
        Self {
            physical: Rating(5),
            mental: Rating(5),
        }
    }
}
