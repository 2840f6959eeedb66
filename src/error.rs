//! Error types shared by the store, the importer and the review session layer.
//!
//! The scheduler itself never fails; everything here comes from the boundary
//! around it (validation, SQLite, files).

use thiserror::Error;

/// A string did not name a known variant of one of the closed enums.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SrsError {
    #[error("a review rated 'forgot' cannot be marked correct")]
    InconsistentOutcome,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("vocabulary not found: {0}")]
    VocabularyNotFound(i64),

    #[error(transparent)]
    Parse(#[from] ParseEnumError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SrsError>;
