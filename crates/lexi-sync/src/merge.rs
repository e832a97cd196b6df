use std::collections::HashMap;

use lexi_types::{VocabEntryMeta, VocabStatus, VocabularyExport};

/// Two-way merge of vocabulary exports.
///
/// Per word: local membership wins status conflicts outright; within
/// one side, the most recently modified entry wins. The result keys by
/// word, so a word can never land in both lists.
pub fn merge_vocabularies(
    local: &VocabularyExport,
    remote: &VocabularyExport,
) -> VocabularyExport {
    let mut merged: HashMap<String, (VocabStatus, VocabEntryMeta, bool)> = HashMap::new();

    for (word, status, meta) in entries(remote) {
        fold(&mut merged, word, status, meta, false);
    }
    for (word, status, meta) in entries(local) {
        fold(&mut merged, word, status, meta, true);
    }

    let mut learning_words = Vec::new();
    let mut mastered_words = Vec::new();
    for (word, (status, meta, _)) in merged {
        match status {
            VocabStatus::Learning => learning_words.push((word, meta)),
            VocabStatus::Mastered => mastered_words.push((word, meta)),
        }
    }
    learning_words.sort_by(|a, b| a.0.cmp(&b.0));
    mastered_words.sort_by(|a, b| a.0.cmp(&b.0));

    VocabularyExport {
        version: local.version.max(remote.version),
        learning_words,
        mastered_words,
    }
}

fn entries(export: &VocabularyExport) -> impl Iterator<Item = (String, VocabStatus, VocabEntryMeta)> + '_ {
    export
        .learning_words
        .iter()
        .map(|(word, meta)| (word.to_lowercase(), VocabStatus::Learning, meta.clone()))
        .chain(
            export
                .mastered_words
                .iter()
                .map(|(word, meta)| (word.to_lowercase(), VocabStatus::Mastered, meta.clone())),
        )
}

fn fold(
    merged: &mut HashMap<String, (VocabStatus, VocabEntryMeta, bool)>,
    word: String,
    status: VocabStatus,
    meta: VocabEntryMeta,
    local: bool,
) {
    match merged.get(&word) {
        Some((_, existing_meta, existing_local)) => {
            let replace = if local != *existing_local {
                // Local always wins over remote.
                local
            } else {
                // Same side listed the word twice: most recently
                // modified status survives the cleanup.
                modified_at(&meta) >= modified_at(existing_meta)
            };
            if replace {
                merged.insert(word, (status, meta, local));
            }
        }
        None => {
            merged.insert(word, (status, meta, local));
        }
    }
}

fn modified_at(meta: &VocabEntryMeta) -> i64 {
    meta.last_reviewed.unwrap_or(meta.added_date)
}
