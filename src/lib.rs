pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use config::Config;
pub use error::{Result, SrsError};
pub use models::{
    CefrLevel, MasteryLevel, ReviewCard, ReviewOutcome, ReviewQuality, Vocabulary,
    VocabularyProgress, WordList,
};
