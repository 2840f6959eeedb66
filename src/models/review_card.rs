//! Scheduling state of one vocabulary item for one learner.
use super::MasteryLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ease factor given to an item on its first review.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Ease factor never drops below this.
pub const MIN_EASE_FACTOR: f64 = 1.3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCard {
    /// Consecutive correct reviews since the last lapse
    pub repetitions: u32,
    pub ease_factor: f64,
    /// Days until the next review
    pub interval_days: u32,
    pub last_review_date: Option<DateTime<Utc>>,
    pub mastery_level: MasteryLevel,
}

impl Default for ReviewCard {
    fn default() -> Self {
        Self {
            repetitions: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval_days: 1,
            last_review_date: None,
            mastery_level: MasteryLevel::New,
        }
    }
}

impl ReviewCard {
    pub fn is_new(&self) -> bool {
        self.last_review_date.is_none()
    }
}
