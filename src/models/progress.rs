//! Persisted review progress of one learner on one vocabulary item.
use super::ReviewCard;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyProgress {
    pub user_id: String,
    pub vocabulary_id: i64,
    #[serde(flatten)]
    pub card: ReviewCard,
    pub next_review_date: DateTime<Utc>,
    pub total_reviews: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
}
