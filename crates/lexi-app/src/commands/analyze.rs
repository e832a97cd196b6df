use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use lexi_core::analyzer::SegmentKind;
use lexi_core::{
    DifficultyIndex, DifficultyTier, HighlightMode, TextAnalyzer, VocabularySets, WordDatabase,
};
use lexi_lemma::Lemmatizer;
use lexi_store::{DirectWordStore, MemoryWordStore, VocabularyStore};
use tokio::sync::Mutex;

use crate::state::AppState;

pub async fn run(
    state: Arc<AppState>,
    text: Option<String>,
    level: Option<String>,
    mode: Option<String>,
) -> anyhow::Result<()> {
    let (highlight, storage) = {
        let config = state.config.read().await;
        (config.highlight.clone(), config.storage.clone())
    };

    let level = level.unwrap_or(highlight.level);
    let level = DifficultyTier::from_str(&level)
        .with_context(|| format!("Unknown difficulty level '{level}'"))?;
    let mode = mode.unwrap_or(highlight.mode);
    let mode =
        HighlightMode::from_str(&mode).with_context(|| format!("Unknown highlight mode '{mode}'"))?;

    let index = match DifficultyIndex::load_from_file(&highlight.frequency_list) {
        Ok(index) => index,
        Err(e) => {
            tracing::warn!(
                "Frequency list {} unavailable ({}), unmatched words score as expert",
                highlight.frequency_list,
                e
            );
            DifficultyIndex::new()
        }
    };

    let text = match text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read text from stdin")?;
            buffer
        }
    };

    let vocabulary = VocabularyStore::load(&storage.vocabulary_path)?;
    let sets = VocabularySets {
        learning: vocabulary.learning_set(),
        mastered: vocabulary.mastered_set(),
    };

    let analyzer = TextAnalyzer::new(index, Lemmatizer::new());
    let words = analyzer.extract_words(&text);
    let analysis = analyzer.analyze(&words, level, mode, &sets);

    // Pull translations for display out of the persistent word store.
    let direct = DirectWordStore::open(&storage.word_db_path, storage.front_cache_capacity)?;
    let db = WordDatabase::new(direct, Arc::new(Mutex::new(MemoryWordStore::new()?)));
    db.initialize().await?;

    let unique: Vec<String> = analysis.words.iter().map(|w| w.word.clone()).collect();
    let records = db.batch_query(&unique).await?;
    let translations: HashMap<String, String> = records
        .into_iter()
        .filter_map(|(word, record)| {
            record
                .map(|r| (word, r.translation))
                .filter(|(_, t)| !t.is_empty())
        })
        .collect();

    let segments = analyzer.segment_for_display(&text, &analysis, &translations);
    let rendered: String = segments
        .iter()
        .map(|segment| match &segment.kind {
            SegmentKind::Word {
                highlight_class: Some(_),
                ..
            } => format!("[{}]", segment.text),
            _ => segment.text.clone(),
        })
        .collect();

    println!("{rendered}");
    println!();
    println!(
        "difficulty {} | {} unique words | {} highlighted | {} new",
        analysis.difficulty_score,
        analysis.words.len(),
        analysis.highlighted_count(),
        analysis.new_words.len()
    );
    for score in analysis.words.iter().filter(|w| w.highlighted) {
        let translation = translations
            .get(&score.word)
            .map(String::as_str)
            .unwrap_or("-");
        println!("  {:<20} {:<12} {}", score.word, score.tier.as_str(), translation);
    }

    Ok(())
}
