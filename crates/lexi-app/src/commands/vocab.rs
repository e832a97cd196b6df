use std::sync::Arc;

use anyhow::Context;
use lexi_store::{DirectWordStore, VocabularyStore};

use crate::VocabAction;
use crate::state::AppState;

pub async fn run(state: Arc<AppState>, action: VocabAction) -> anyhow::Result<()> {
    let storage = {
        let config = state.config.read().await;
        config.storage.clone()
    };
    let path = storage.vocabulary_path.clone();
    let mut store = VocabularyStore::load(&path)?;

    match action {
        VocabAction::Add { word } => {
            let (translation, phonetic) = lookup_details(&storage.word_db_path, &word);
            if store.add_learning(&word, translation, phonetic) {
                store.save(&path)?;
                println!("Added '{word}' to the learning list");
            } else {
                println!("'{word}' is already being learned");
            }
        }
        VocabAction::Master { word } => {
            if store.mark_mastered(&word) {
                store.save(&path)?;
                println!("Marked '{word}' as mastered");
            } else {
                println!("'{word}' is already mastered");
            }
        }
        VocabAction::Remove { word } => {
            if store.remove(&word) {
                store.save(&path)?;
                println!("Removed '{word}'");
            } else {
                println!("'{word}' is not in the vocabulary");
            }
        }
        VocabAction::List => {
            let export = store.export();
            println!("learning ({}):", export.learning_words.len());
            for (word, meta) in &export.learning_words {
                let translation = meta.translation.as_deref().unwrap_or("-");
                println!("  {word:<20} {translation}");
            }
            println!("mastered ({}):", export.mastered_words.len());
            for (word, _) in &export.mastered_words {
                println!("  {word}");
            }
        }
        VocabAction::Clear => {
            store.clear();
            store.save(&path)?;
            println!("Vocabulary cleared");
        }
        VocabAction::Export { path: out } => {
            std::fs::write(&out, store.export_json()?)
                .with_context(|| format!("Failed to write {out}"))?;
            println!("Exported {} words to {out}", store.len());
        }
        VocabAction::Import { path: input } => {
            let json = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {input}"))?;
            let (learning, mastered) = store
                .import_json(&json)
                .context("Import failed, the existing vocabulary is unchanged")?;
            store.save(&path)?;
            println!("Imported {learning} learning and {mastered} mastered words");
        }
    }

    Ok(())
}

/// Best-effort dictionary details for a newly added word.
fn lookup_details(word_db_path: &str, word: &str) -> (Option<String>, Option<String>) {
    let Ok(mut direct) = DirectWordStore::open(word_db_path, 16) else {
        return (None, None);
    };
    match direct.query_word(word) {
        Ok(Some(record)) => (
            (!record.translation.is_empty()).then_some(record.translation),
            (!record.phonetic.is_empty()).then_some(record.phonetic),
        ),
        _ => (None, None),
    }
}
