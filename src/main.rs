use chrono::Utc;
use vocab_srs::database::db::{
    count_vocabularies, get_vocabulary_stats, import_word_list, init_database,
};
use vocab_srs::export::json;
use vocab_srs::*;

const DEMO_USER: &str = "demo";

fn sample_word_list() -> WordList {
    WordList {
        name: "Starter Words".to_string(),
        vocabularies: vec![
            Vocabulary::new("hello", "안녕하세요", CefrLevel::A1),
            Vocabulary::new("thank you", "감사합니다", CefrLevel::A1),
            Vocabulary::new("please", "부탁합니다", CefrLevel::A1),
        ],
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config_path =
        std::env::var("VOCAB_SRS_CONFIG").unwrap_or_else(|_| "vocab_srs.toml".to_string());
    let config = Config::load(&config_path)?;
    let conn = init_database(&config.database_path)?;
    let now = Utc::now();

    if count_vocabularies(&conn)? == 0 {
        import_word_list(&sample_word_list(), now, &conn)?;
        log::info!("sample vocabulary created");
    }

    if let Some(path) = std::env::args().nth(1) {
        let list = json::import_word_list(&path)?;
        import_word_list(&list, now, &conn)?;
    }

    let stats = get_vocabulary_stats(DEMO_USER, now, &conn)?;
    log::info!(
        "{} words in database; user '{}' has {} learned, {} mastered, {} due",
        count_vocabularies(&conn)?,
        DEMO_USER,
        stats.total_learned,
        stats.mastered,
        stats.due_for_review
    );
    for (level, count) in &stats.by_mastery_level {
        log::info!("  - {}: {}", level, count);
    }

    Ok(())
}
