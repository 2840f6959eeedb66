//! Vocabulary surfaced for a study session, with the learner's current standing.
use super::{MasteryLevel, Vocabulary};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyCard {
    pub vocabulary_id: i64,
    #[serde(flatten)]
    pub vocabulary: Vocabulary,
    pub mastery_level: MasteryLevel,
    pub next_review_date: DateTime<Utc>,
}

impl StudyCard {
    /// Card for a word the learner has never reviewed; it is due right away.
    pub fn unseen(vocabulary_id: i64, vocabulary: Vocabulary, now: DateTime<Utc>) -> Self {
        Self {
            vocabulary_id,
            vocabulary,
            mastery_level: MasteryLevel::New,
            next_review_date: now,
        }
    }
}
