//! Validated result of a single review, as handed to the scheduler.
use super::ReviewQuality;
use crate::error::{Result, SrsError};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    quality: ReviewQuality,
    is_correct: bool,
}

impl ReviewOutcome {
    /// Rejects `Forgot` paired with a correct answer.
    pub fn new(quality: ReviewQuality, is_correct: bool) -> Result<Self> {
        if quality == ReviewQuality::Forgot && is_correct {
            return Err(SrsError::InconsistentOutcome);
        }
        Ok(Self {
            quality,
            is_correct,
        })
    }

    pub fn quality(&self) -> ReviewQuality {
        self.quality
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forgot_marked_correct_is_rejected() {
        let result = ReviewOutcome::new(ReviewQuality::Forgot, true);
        assert!(matches!(result, Err(SrsError::InconsistentOutcome)));
    }

    #[test]
    fn test_other_pairings_are_accepted() {
        assert!(ReviewOutcome::new(ReviewQuality::Forgot, false).is_ok());
        for quality in [ReviewQuality::Hard, ReviewQuality::Normal, ReviewQuality::Easy] {
            assert!(ReviewOutcome::new(quality, true).is_ok());
            assert!(ReviewOutcome::new(quality, false).is_ok());
        }
    }
}
