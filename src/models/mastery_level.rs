//! Display tier summarizing how mature an item's schedule is.
//! Derived from (repetitions, interval); never set on its own.
use crate::error::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Interval (days) an item needs, on top of enough repetitions, to count as mastered.
pub const MASTERED_INTERVAL_DAYS: u32 = 180;

/// Repetitions needed before an item can be mastered.
pub const MASTERED_MIN_REPETITIONS: u32 = 8;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MasteryLevel {
    #[default]
    New,
    Learning,
    Reviewing,
    Mastered,
}

impl MasteryLevel {
    pub const ALL: [MasteryLevel; 4] = [Self::New, Self::Learning, Self::Reviewing, Self::Mastered];

    pub fn from_progress(repetitions: u32, interval_days: u32) -> Self {
        match repetitions {
            0 => Self::New,
            1..=2 => Self::Learning,
            3..=7 => Self::Reviewing,
            _ if interval_days >= MASTERED_INTERVAL_DAYS => Self::Mastered,
            _ => Self::Reviewing,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Reviewing => "reviewing",
            Self::Mastered => "mastered",
        }
    }
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MasteryLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "learning" => Ok(Self::Learning),
            "reviewing" => Ok(Self::Reviewing),
            "mastered" => Ok(Self::Mastered),
            other => Err(ParseEnumError::new("mastery level", other)),
        }
    }
}
