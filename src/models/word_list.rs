//! Word list is a named set of vocabulary, the unit of JSON import/export
use super::Vocabulary;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordList {
    pub name: String,
    pub vocabularies: Vec<Vocabulary>,
}

impl Default for WordList {
    fn default() -> Self {
        Self {
            name: "My Words".to_string(),
            vocabularies: Vec::new(),
        }
    }
}
