//! Runtime configuration, read from a TOML file.
//!
//! Every key is optional; a missing file means all defaults.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Number of items returned by a session fetch when no limit is given
    pub default_session_limit: usize,
    /// Upper bound accepted for a session fetch limit
    pub max_session_limit: usize,
    /// Upper bound on reviews accepted in one submission
    pub max_reviews_per_submission: usize,
    /// Reward points per correct answer in a submission summary
    pub xp_per_correct: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("db.sqlite3"),
            default_session_limit: 20,
            max_session_limit: 50,
            max_reviews_per_submission: 100,
            xp_per_correct: 5,
        }
    }
}

impl Config {
    /// Loads the config at `path`, falling back to defaults if it doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "database_path = \"words.db\"").unwrap();
        writeln!(file, "xp_per_correct = 10").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.database_path, PathBuf::from("words.db"));
        assert_eq!(config.xp_per_correct, 10);
        assert_eq!(config.default_session_limit, 20);
        assert_eq!(config.max_reviews_per_submission, 100);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "xp_per_correct = \"lots\"").unwrap();

        assert!(Config::load(file.path()).is_err());
    }
}
