//! JSON import/export module for word lists.
//! Saves and loads WordList structures to/from JSON files.

use crate::error::Result;
use crate::models::WordList;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Exports a word list to a pretty-printed JSON file at `path`.
pub fn export_word_list(list: &WordList, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, list)?;
    writer.flush()?;

    log::info!(
        "exported word list '{}' ({} words) to {}",
        list.name,
        list.vocabularies.len(),
        path.display()
    );
    Ok(())
}

/// Imports a word list from a JSON file.
pub fn import_word_list(path: impl AsRef<Path>) -> Result<WordList> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let list: WordList = serde_json::from_reader(reader)?;

    log::info!("read word list '{}' from {}", list.name, path.display());
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SrsError;
    use crate::models::{CefrLevel, Vocabulary};
    use std::fs;

    fn create_test_list() -> WordList {
        let mut greeting = Vocabulary::new("hello", "안녕하세요", CefrLevel::A1);
        greeting.pronunciation = Some("/həˈloʊ/".to_string());
        WordList {
            name: "Test Words".to_string(),
            vocabularies: vec![greeting, Vocabulary::new("goodbye", "안녕히 가세요", CefrLevel::A1)],
        }
    }

    #[test]
    fn test_export_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");

        export_word_list(&create_test_list(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"name\": \"Test Words\""));
        assert!(written.contains("\"level\": \"A1\""));
    }

    #[test]
    fn test_import_word_list() {
        let json_content = r#"{
  "name": "Import Test",
  "vocabularies": [
    {
      "word": "decide",
      "meaning": "결정하다",
      "exampleSentence": "We decided to stay.",
      "level": "B1"
    }
  ]
}"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.json");
        fs::write(&path, json_content).unwrap();

        let list = import_word_list(&path).unwrap();
        assert_eq!(list.name, "Import Test");
        assert_eq!(list.vocabularies.len(), 1);
        assert_eq!(list.vocabularies[0].word, "decide");
        assert_eq!(list.vocabularies[0].level, CefrLevel::B1);
        assert_eq!(
            list.vocabularies[0].example_sentence.as_deref(),
            Some("We decided to stay.")
        );
    }

    #[test]
    fn test_export_then_import_keeps_words() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");
        let original = create_test_list();

        export_word_list(&original, &path).unwrap();
        assert_eq!(import_word_list(&path).unwrap(), original);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = import_word_list(dir.path().join("missing.json"));
        assert!(matches!(result, Err(SrsError::Io(_))));
    }

    #[test]
    fn test_import_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(matches!(import_word_list(&path), Err(SrsError::Json(_))));
    }

    #[test]
    fn test_import_unknown_level_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_level.json");
        fs::write(
            &path,
            r#"{"name": "x", "vocabularies": [{"word": "a", "meaning": "b", "level": "Z9"}]}"#,
        )
        .unwrap();

        assert!(import_word_list(&path).is_err());
    }
}
