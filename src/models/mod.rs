pub mod mastery_level;
pub mod progress;
pub mod review_card;
pub mod review_outcome;
pub mod review_quality;
pub mod sm2;
pub mod study_card;
pub mod study_session;
pub mod vocabulary;
pub mod word_list;

pub use mastery_level::MasteryLevel;
pub use progress::VocabularyProgress;
pub use review_card::ReviewCard;
pub use review_outcome::ReviewOutcome;
pub use review_quality::ReviewQuality;
pub use study_card::StudyCard;
pub use vocabulary::{CefrLevel, Vocabulary};
pub use word_list::WordList;
