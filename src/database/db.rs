//! Database operations for the vocabulary scheduler
//!
//! Handles SQLite initialization, vocabulary storage, per-learner review
//! progress and study session records. Timestamps are stored as unix seconds.

use crate::error::{Result, SrsError};
use crate::models::sm2::schedule_next_review;
use crate::models::study_session::{QualityCounts, StudyMode, StudySessionRecord};
use crate::models::{
    CefrLevel, MasteryLevel, ReviewCard, ReviewOutcome, Vocabulary, VocabularyProgress, WordList,
};
use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, Transaction, TransactionBehavior, params};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Per-learner overview of review progress.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyStats {
    pub by_mastery_level: BTreeMap<MasteryLevel, usize>,
    pub due_for_review: usize,
    pub total_learned: usize,
    pub mastered: usize,
}

/// Opens (or creates) the database file and makes sure all tables exist.
pub fn init_database(path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(path.as_ref())?;
    create_tables(&conn)?;
    log::info!("opened database at {}", path.as_ref().display());
    Ok(conn)
}

/// Fresh in-memory database, used by tests and throwaway sessions.
pub fn init_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_tables(&conn)?;
    Ok(conn)
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS vocabularies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word TEXT NOT NULL,
            meaning TEXT NOT NULL,
            pronunciation TEXT,
            example_sentence TEXT,
            level TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            UNIQUE(word, level)
        )",
        (),
    )?;

    // One row per (learner, vocabulary); the composite key is what makes
    // the review upsert a single atomic write
    conn.execute(
        "CREATE TABLE IF NOT EXISTS user_vocabularies (
            user_id TEXT NOT NULL,
            vocabulary_id INTEGER NOT NULL,
            repetitions INTEGER NOT NULL DEFAULT 0,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 1,
            last_review_date INTEGER,
            next_review_date INTEGER NOT NULL,
            mastery_level TEXT NOT NULL DEFAULT 'new',
            total_reviews INTEGER NOT NULL DEFAULT 0,
            correct_count INTEGER NOT NULL DEFAULT 0,
            incorrect_count INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (user_id, vocabulary_id),
            FOREIGN KEY (vocabulary_id) REFERENCES vocabularies(id) ON DELETE CASCADE
        )",
        (),
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_user_vocabularies_due
         ON user_vocabularies (user_id, next_review_date)",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS study_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            mode TEXT NOT NULL,
            vocabulary_count INTEGER NOT NULL,
            accuracy REAL NOT NULL,
            duration INTEGER NOT NULL,
            easy_count INTEGER NOT NULL,
            normal_count INTEGER NOT NULL,
            hard_count INTEGER NOT NULL,
            forgot_count INTEGER NOT NULL,
            created_at INTEGER NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn to_timestamp(date: DateTime<Utc>) -> i64 {
    date.timestamp()
}

fn from_timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn parse_column<T>(value: ValueRef<'_>) -> FromSqlResult<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .as_str()?
        .parse()
        .map_err(|e| FromSqlError::Other(Box::new(e)))
}

impl ToSql for MasteryLevel {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for MasteryLevel {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_column(value)
    }
}

impl ToSql for CefrLevel {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CefrLevel {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_column(value)
    }
}

impl ToSql for StudyMode {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for StudyMode {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_column(value)
    }
}

fn vocabulary_from_row(row: &Row) -> rusqlite::Result<Vocabulary> {
    Ok(Vocabulary {
        word: row.get("word")?,
        meaning: row.get("meaning")?,
        pronunciation: row.get("pronunciation")?,
        example_sentence: row.get("example_sentence")?,
        level: row.get("level")?,
    })
}

fn progress_from_row(row: &Row) -> rusqlite::Result<VocabularyProgress> {
    let last_review: Option<i64> = row.get("last_review_date")?;
    Ok(VocabularyProgress {
        user_id: row.get("user_id")?,
        vocabulary_id: row.get("vocabulary_id")?,
        card: ReviewCard {
            repetitions: row.get("repetitions")?,
            ease_factor: row.get("ease_factor")?,
            interval_days: row.get("interval_days")?,
            last_review_date: last_review.map(from_timestamp),
            mastery_level: row.get("mastery_level")?,
        },
        next_review_date: from_timestamp(row.get("next_review_date")?),
        total_reviews: row.get("total_reviews")?,
        correct_count: row.get("correct_count")?,
        incorrect_count: row.get("incorrect_count")?,
    })
}

/// Inserts a vocabulary item and returns its ID.
///
/// A word already present at the same level is left untouched and its
/// existing ID is returned.
pub fn add_vocabulary(
    vocabulary: &Vocabulary,
    created_at: DateTime<Utc>,
    conn: &Connection,
) -> Result<i64> {
    Ok(insert_vocabulary(vocabulary, created_at, conn)?.0)
}

/// Returns the ID and whether a new row was written.
fn insert_vocabulary(
    vocabulary: &Vocabulary,
    created_at: DateTime<Utc>,
    conn: &Connection,
) -> Result<(i64, bool)> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO vocabularies
            (word, meaning, pronunciation, example_sentence, level, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            vocabulary.word,
            vocabulary.meaning,
            vocabulary.pronunciation,
            vocabulary.example_sentence,
            vocabulary.level,
            to_timestamp(created_at)
        ],
    )?;

    let id: i64 = conn.query_row(
        "SELECT id FROM vocabularies WHERE word = ?1 AND level = ?2",
        params![vocabulary.word, vocabulary.level],
        |row| row.get(0),
    )?;

    Ok((id, inserted > 0))
}

/// Adds every word of a list in one transaction. Returns how many were new.
pub fn import_word_list(list: &WordList, now: DateTime<Utc>, conn: &Connection) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut added = 0;
    for vocabulary in &list.vocabularies {
        if insert_vocabulary(vocabulary, now, &tx)?.1 {
            added += 1;
        }
    }
    tx.commit()?;

    log::info!(
        "imported word list '{}': {} new of {} words",
        list.name,
        added,
        list.vocabularies.len()
    );
    Ok(added)
}

pub fn get_vocabulary(vocabulary_id: i64, conn: &Connection) -> Result<Option<Vocabulary>> {
    let vocabulary = conn
        .query_row(
            "SELECT word, meaning, pronunciation, example_sentence, level
             FROM vocabularies WHERE id = ?1",
            params![vocabulary_id],
            vocabulary_from_row,
        )
        .optional()?;
    Ok(vocabulary)
}

/// IDs from `vocabulary_ids` with no matching vocabulary, in input order.
pub fn missing_vocabulary_ids(vocabulary_ids: &[i64], conn: &Connection) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT EXISTS(SELECT 1 FROM vocabularies WHERE id = ?1)")?;
    let mut missing = Vec::new();
    for &id in vocabulary_ids {
        let exists: bool = stmt.query_row(params![id], |row| row.get(0))?;
        if !exists && !missing.contains(&id) {
            missing.push(id);
        }
    }
    Ok(missing)
}

pub fn count_vocabularies(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM vocabularies", [], |row| row.get(0))?;
    Ok(count as usize)
}

/// Review progress of a learner on one item, `None` if never reviewed.
pub fn get_progress(
    user_id: &str,
    vocabulary_id: i64,
    conn: &Connection,
) -> Result<Option<VocabularyProgress>> {
    let progress = conn
        .query_row(
            "SELECT * FROM user_vocabularies WHERE user_id = ?1 AND vocabulary_id = ?2",
            params![user_id, vocabulary_id],
            progress_from_row,
        )
        .optional()?;
    Ok(progress)
}

/// Writes a progress row, replacing any existing row for the same pair.
pub fn upsert_progress(progress: &VocabularyProgress, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO user_vocabularies
            (user_id, vocabulary_id, repetitions, ease_factor, interval_days,
             last_review_date, next_review_date, mastery_level,
             total_reviews, correct_count, incorrect_count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT (user_id, vocabulary_id) DO UPDATE SET
            repetitions = excluded.repetitions,
            ease_factor = excluded.ease_factor,
            interval_days = excluded.interval_days,
            last_review_date = excluded.last_review_date,
            next_review_date = excluded.next_review_date,
            mastery_level = excluded.mastery_level,
            total_reviews = excluded.total_reviews,
            correct_count = excluded.correct_count,
            incorrect_count = excluded.incorrect_count",
        params![
            progress.user_id,
            progress.vocabulary_id,
            progress.card.repetitions,
            progress.card.ease_factor,
            progress.card.interval_days,
            progress.card.last_review_date.map(to_timestamp),
            to_timestamp(progress.next_review_date),
            progress.card.mastery_level,
            progress.total_reviews,
            progress.correct_count,
            progress.incorrect_count
        ],
    )?;
    Ok(())
}

/// Applies one review to a learner's progress on an item.
///
/// Reads the current card (defaults for a first review), runs the scheduler
/// and writes the result back inside a single IMMEDIATE transaction, so two
/// reviews of the same pair can't interleave and lose an update.
/// `now` is truncated to whole seconds, the precision the store keeps.
pub fn record_review(
    user_id: &str,
    vocabulary_id: i64,
    outcome: &ReviewOutcome,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<VocabularyProgress> {
    let now = now.trunc_subsecs(0);
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    let exists: bool = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM vocabularies WHERE id = ?1)",
        params![vocabulary_id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(SrsError::VocabularyNotFound(vocabulary_id));
    }

    let existing = get_progress(user_id, vocabulary_id, &tx)?;
    let (card, total_reviews, correct_count, incorrect_count) = match existing {
        Some(p) => (p.card, p.total_reviews, p.correct_count, p.incorrect_count),
        None => (ReviewCard::default(), 0, 0, 0),
    };

    let result = schedule_next_review(&card, outcome.quality(), outcome.is_correct(), now);
    let next_review_date = result.next_review_date;

    let progress = VocabularyProgress {
        user_id: user_id.to_string(),
        vocabulary_id,
        card: result.into_card(now),
        next_review_date,
        total_reviews: total_reviews + 1,
        correct_count: correct_count + u32::from(outcome.is_correct()),
        incorrect_count: incorrect_count + u32::from(!outcome.is_correct()),
    };

    upsert_progress(&progress, &tx)?;
    tx.commit()?;

    log::debug!(
        "user {} reviewed vocabulary {} ({}, correct: {}): interval {}d, {}",
        user_id,
        vocabulary_id,
        outcome.quality(),
        outcome.is_correct(),
        progress.card.interval_days,
        progress.card.mastery_level
    );
    Ok(progress)
}

/// Items due for review (next_review_date <= now), oldest due first.
pub fn get_due_vocabularies(
    user_id: &str,
    now: DateTime<Utc>,
    limit: usize,
    conn: &Connection,
) -> Result<Vec<(Vocabulary, VocabularyProgress)>> {
    let mut stmt = conn.prepare(
        "SELECT v.word, v.meaning, v.pronunciation, v.example_sentence, v.level, p.*
         FROM user_vocabularies p
         JOIN vocabularies v ON v.id = p.vocabulary_id
         WHERE p.user_id = ?1 AND p.next_review_date <= ?2
         ORDER BY p.next_review_date ASC, p.vocabulary_id ASC
         LIMIT ?3",
    )?;

    let due = stmt
        .query_map(params![user_id, to_timestamp(now), limit as i64], |row| {
            Ok((vocabulary_from_row(row)?, progress_from_row(row)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(due)
}

/// Items of `level` the learner has never reviewed, in the order they were added.
pub fn get_new_vocabularies(
    user_id: &str,
    level: CefrLevel,
    limit: usize,
    conn: &Connection,
) -> Result<Vec<(i64, Vocabulary)>> {
    let mut stmt = conn.prepare(
        "SELECT v.id, v.word, v.meaning, v.pronunciation, v.example_sentence, v.level
         FROM vocabularies v
         WHERE v.level = ?2
           AND NOT EXISTS (
               SELECT 1 FROM user_vocabularies p
               WHERE p.user_id = ?1 AND p.vocabulary_id = v.id
           )
         ORDER BY v.created_at ASC, v.id ASC
         LIMIT ?3",
    )?;

    let fresh = stmt
        .query_map(params![user_id, level, limit as i64], |row| {
            Ok((row.get("id")?, vocabulary_from_row(row)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(fresh)
}

/// Counts a learner's items by mastery level and how many are due at `now`.
pub fn get_vocabulary_stats(
    user_id: &str,
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<VocabularyStats> {
    let mut by_mastery_level: BTreeMap<MasteryLevel, usize> =
        MasteryLevel::ALL.iter().map(|&level| (level, 0)).collect();

    let mut stmt = conn.prepare(
        "SELECT mastery_level, COUNT(*) FROM user_vocabularies
         WHERE user_id = ?1 GROUP BY mastery_level",
    )?;
    let groups = stmt
        .query_map(params![user_id], |row| {
            Ok((row.get::<_, MasteryLevel>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for (level, count) in groups {
        by_mastery_level.insert(level, count as usize);
    }

    let due: i64 = conn.query_row(
        "SELECT COUNT(*) FROM user_vocabularies WHERE user_id = ?1 AND next_review_date <= ?2",
        params![user_id, to_timestamp(now)],
        |row| row.get(0),
    )?;

    let total_learned = by_mastery_level.values().sum();
    let mastered = by_mastery_level[&MasteryLevel::Mastered];

    Ok(VocabularyStats {
        by_mastery_level,
        due_for_review: due as usize,
        total_learned,
        mastered,
    })
}

/// Stores the summary of a submitted study session and returns its ID.
pub fn save_study_session(record: &StudySessionRecord, conn: &Connection) -> Result<i64> {
    conn.execute(
        "INSERT INTO study_sessions
            (user_id, mode, vocabulary_count, accuracy, duration,
             easy_count, normal_count, hard_count, forgot_count, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            record.user_id,
            record.mode,
            record.vocabulary_count,
            record.accuracy,
            record.duration,
            record.counts.easy,
            record.counts.normal,
            record.counts.hard,
            record.counts.forgot,
            to_timestamp(record.created_at)
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// A learner's study sessions, most recent first.
pub fn get_study_sessions(user_id: &str, conn: &Connection) -> Result<Vec<StudySessionRecord>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, mode, vocabulary_count, accuracy, duration,
                easy_count, normal_count, hard_count, forgot_count, created_at
         FROM study_sessions WHERE user_id = ?1
         ORDER BY created_at DESC, id DESC",
    )?;

    let sessions = stmt
        .query_map(params![user_id], |row| {
            Ok(StudySessionRecord {
                user_id: row.get(0)?,
                mode: row.get(1)?,
                vocabulary_count: row.get(2)?,
                accuracy: row.get(3)?,
                duration: row.get(4)?,
                counts: QualityCounts {
                    easy: row.get(5)?,
                    normal: row.get(6)?,
                    hard: row.get(7)?,
                    forgot: row.get(8)?,
                },
                created_at: from_timestamp(row.get(9)?),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(sessions)
}
