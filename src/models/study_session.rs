//! Study session handling: fetching the words to study and applying a
//! submitted batch of reviews.
//!
//! Each submitted review is an independent scheduler call on its own
//! (learner, vocabulary) pair, applied in submission order.

use super::{CefrLevel, MasteryLevel, ReviewOutcome, ReviewQuality, StudyCard};
use crate::config::Config;
use crate::database::db;
use crate::error::{ParseEnumError, Result, SrsError};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the learner practised during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    Review,
    New,
    Flashcard,
    Matching,
    Choice,
    Typing,
    Listening,
}

impl StudyMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::New => "new",
            Self::Flashcard => "flashcard",
            Self::Matching => "matching",
            Self::Choice => "choice",
            Self::Typing => "typing",
            Self::Listening => "listening",
        }
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "review" => Ok(Self::Review),
            "new" => Ok(Self::New),
            "flashcard" => Ok(Self::Flashcard),
            "matching" => Ok(Self::Matching),
            "choice" => Ok(Self::Choice),
            "typing" => Ok(Self::Typing),
            "listening" => Ok(Self::Listening),
            other => Err(ParseEnumError::new("study mode", other)),
        }
    }
}

/// Which words a session fetch returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Words already seen and now due, oldest due first
    #[default]
    Review,
    /// Words never seen at the learner's level, in the order they were added
    New,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SessionQuery {
    #[serde(default)]
    pub mode: SessionMode,
    pub limit: Option<usize>,
}

impl SessionQuery {
    /// A missing or zero limit means the configured default.
    fn resolve_limit(&self, config: &Config) -> Result<usize> {
        let limit = match self.limit {
            None | Some(0) => config.default_session_limit,
            Some(limit) => limit,
        };
        if limit == 0 || limit > config.max_session_limit {
            return Err(SrsError::InvalidRequest(format!(
                "limit must be between 1 and {}, got {}",
                config.max_session_limit, limit
            )));
        }
        Ok(limit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub vocabulary_id: i64,
    pub quality: ReviewQuality,
    pub is_correct: bool,
    /// Seconds spent on the item
    pub time_spent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub reviews: Vec<ReviewEntry>,
    pub mode: StudyMode,
    /// Total session length in seconds
    pub duration: u32,
}

impl ReviewRequest {
    /// Checks batch size and every quality/correctness pairing.
    /// Returns the validated outcomes in submission order.
    pub fn validate(&self, config: &Config) -> Result<Vec<ReviewOutcome>> {
        if self.reviews.is_empty() {
            return Err(SrsError::InvalidRequest(
                "at least one review is required".to_string(),
            ));
        }
        if self.reviews.len() > config.max_reviews_per_submission {
            return Err(SrsError::InvalidRequest(format!(
                "at most {} reviews per submission, got {}",
                config.max_reviews_per_submission,
                self.reviews.len()
            )));
        }

        self.reviews
            .iter()
            .map(|entry| ReviewOutcome::new(entry.quality, entry.is_correct))
            .collect()
    }
}

/// Number of reviews per quality rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCounts {
    pub easy: u32,
    pub normal: u32,
    pub hard: u32,
    pub forgot: u32,
}

impl QualityCounts {
    pub fn record(&mut self, quality: ReviewQuality) {
        match quality {
            ReviewQuality::Easy => self.easy += 1,
            ReviewQuality::Normal => self.normal += 1,
            ReviewQuality::Hard => self.hard += 1,
            ReviewQuality::Forgot => self.forgot += 1,
        }
    }
}

/// Stored summary of one submitted session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySessionRecord {
    pub user_id: String,
    pub mode: StudyMode,
    pub vocabulary_count: u32,
    /// Percentage of correct answers
    pub accuracy: f64,
    pub duration: u32,
    pub counts: QualityCounts,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    pub vocabulary_id: i64,
    pub mastery_level: MasteryLevel,
    pub next_review_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSummary {
    pub total: u32,
    pub correct: u32,
    /// Percentage rounded to one decimal place
    pub accuracy: f64,
    pub xp_earned: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitResponse {
    pub summary: SubmitSummary,
    pub results: Vec<ReviewResult>,
}

/// Applies a batch of reviews for one learner and records the session.
///
/// The whole batch is validated before anything is written; a malformed
/// entry or an unknown vocabulary ID rejects the submission.
pub fn submit_reviews(
    user_id: &str,
    request: &ReviewRequest,
    config: &Config,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<SubmitResponse> {
    let outcomes = request.validate(config)?;

    let ids: Vec<i64> = request.reviews.iter().map(|entry| entry.vocabulary_id).collect();
    if let Some(&missing) = db::missing_vocabulary_ids(&ids, conn)?.first() {
        return Err(SrsError::VocabularyNotFound(missing));
    }

    let mut results = Vec::with_capacity(outcomes.len());
    let mut counts = QualityCounts::default();
    let mut correct = 0u32;

    for (entry, outcome) in request.reviews.iter().zip(&outcomes) {
        let progress = db::record_review(user_id, entry.vocabulary_id, outcome, now, conn)?;

        if outcome.is_correct() {
            correct += 1;
        }
        counts.record(outcome.quality());

        results.push(ReviewResult {
            vocabulary_id: entry.vocabulary_id,
            mastery_level: progress.card.mastery_level,
            next_review_date: progress.next_review_date,
        });
    }

    let total = outcomes.len() as u32;
    let accuracy = f64::from(correct) / f64::from(total) * 100.0;

    let record = StudySessionRecord {
        user_id: user_id.to_string(),
        mode: request.mode,
        vocabulary_count: total,
        accuracy,
        duration: request.duration,
        counts,
        created_at: now,
    };
    db::save_study_session(&record, conn)?;

    let summary = SubmitSummary {
        total,
        correct,
        accuracy: (accuracy * 10.0).round() / 10.0,
        xp_earned: correct * config.xp_per_correct,
    };
    log::info!(
        "user {} submitted {} reviews in {} mode: {}/{} correct",
        user_id,
        total,
        request.mode,
        correct,
        total
    );

    Ok(SubmitResponse { summary, results })
}

/// Picks the words a learner should study next.
pub fn fetch_session(
    user_id: &str,
    level: CefrLevel,
    query: &SessionQuery,
    config: &Config,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<Vec<StudyCard>> {
    let limit = query.resolve_limit(config)?;

    let cards: Vec<StudyCard> = match query.mode {
        SessionMode::Review => db::get_due_vocabularies(user_id, now, limit, conn)?
            .into_iter()
            .map(|(vocabulary, progress)| StudyCard {
                vocabulary_id: progress.vocabulary_id,
                vocabulary,
                mastery_level: progress.card.mastery_level,
                next_review_date: progress.next_review_date,
            })
            .collect(),
        SessionMode::New => db::get_new_vocabularies(user_id, level, limit, conn)?
            .into_iter()
            .map(|(id, vocabulary)| StudyCard::unseen(id, vocabulary, now))
            .collect(),
    };

    log::debug!(
        "session for user {} ({:?}): {} cards",
        user_id,
        query.mode,
        cards.len()
    );
    Ok(cards)
}
