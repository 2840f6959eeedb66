//! Learner's self-reported recall difficulty for one review.
use crate::error::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered from worst to best recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewQuality {
    Forgot,
    Hard,
    Normal,
    Easy,
}

impl ReviewQuality {
    pub const ALL: [ReviewQuality; 4] = [Self::Forgot, Self::Hard, Self::Normal, Self::Easy];

    /// Change applied to the ease factor after a review of this quality.
    pub fn ease_adjustment(self) -> f64 {
        match self {
            Self::Easy => 0.15,
            Self::Normal => 0.0,
            Self::Hard => -0.15,
            Self::Forgot => -0.2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forgot => "forgot",
            Self::Hard => "hard",
            Self::Normal => "normal",
            Self::Easy => "easy",
        }
    }
}

impl fmt::Display for ReviewQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewQuality {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forgot" => Ok(Self::Forgot),
            "hard" => Ok(Self::Hard),
            "normal" => Ok(Self::Normal),
            "easy" => Ok(Self::Easy),
            other => Err(ParseEnumError::new("review quality", other)),
        }
    }
}
