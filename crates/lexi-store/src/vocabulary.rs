use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use lexi_types::{VocabEntryMeta, VocabStatus, VocabularyExport};

use crate::error::{StoreError, StoreResult};

const FORMAT_VERSION: u32 = 1;

/// The user's learning/mastered word lists.
///
/// One map keyed by lowercased word keeps the invariant that a word is
/// in at most one list. Mutations happen on explicit user action only;
/// persistence is pretty-printed JSON so exports stay human-readable.
pub struct VocabularyStore {
    items: HashMap<String, (VocabStatus, VocabEntryMeta)>,
}

impl VocabularyStore {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let json = std::fs::read_to_string(path)?;
        let mut store = Self::new();
        store.import_json(&json)?;
        Ok(store)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> StoreResult<()> {
        std::fs::write(path, self.export_json()?)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn status(&self, word: &str) -> Option<VocabStatus> {
        self.items.get(&normalize(word)).map(|(status, _)| *status)
    }

    /// Add a word to the learning list, or move it there. Returns false
    /// when the word was already learning.
    pub fn add_learning(
        &mut self,
        word: &str,
        translation: Option<String>,
        phonetic: Option<String>,
    ) -> bool {
        let key = normalize(word);
        match self.items.get_mut(&key) {
            Some((status @ VocabStatus::Mastered, _)) => {
                *status = VocabStatus::Learning;
                true
            }
            Some(_) => false,
            None => {
                let meta = VocabEntryMeta {
                    phonetic,
                    translation,
                    added_date: now(),
                    review_count: 0,
                    last_reviewed: None,
                };
                self.items.insert(key, (VocabStatus::Learning, meta));
                true
            }
        }
    }

    /// Promote a word to mastered, creating it if unknown.
    pub fn mark_mastered(&mut self, word: &str) -> bool {
        let key = normalize(word);
        match self.items.get_mut(&key) {
            Some((status @ VocabStatus::Learning, _)) => {
                *status = VocabStatus::Mastered;
                true
            }
            Some(_) => false,
            None => {
                let meta = VocabEntryMeta {
                    added_date: now(),
                    ..Default::default()
                };
                self.items.insert(key, (VocabStatus::Mastered, meta));
                true
            }
        }
    }

    pub fn remove(&mut self, word: &str) -> bool {
        self.items.remove(&normalize(word)).is_some()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Bump review bookkeeping for a learning word.
    pub fn record_review(&mut self, word: &str) {
        if let Some((_, meta)) = self.items.get_mut(&normalize(word)) {
            meta.review_count += 1;
            meta.last_reviewed = Some(now());
        }
    }

    pub fn learning_set(&self) -> HashSet<String> {
        self.set_of(VocabStatus::Learning)
    }

    pub fn mastered_set(&self) -> HashSet<String> {
        self.set_of(VocabStatus::Mastered)
    }

    fn set_of(&self, wanted: VocabStatus) -> HashSet<String> {
        self.items
            .iter()
            .filter(|(_, (status, _))| *status == wanted)
            .map(|(word, _)| word.clone())
            .collect()
    }

    pub fn export(&self) -> VocabularyExport {
        let mut learning_words = Vec::new();
        let mut mastered_words = Vec::new();
        for (word, (status, meta)) in &self.items {
            match status {
                VocabStatus::Learning => learning_words.push((word.clone(), meta.clone())),
                VocabStatus::Mastered => mastered_words.push((word.clone(), meta.clone())),
            }
        }
        learning_words.sort_by(|a, b| a.0.cmp(&b.0));
        mastered_words.sort_by(|a, b| a.0.cmp(&b.0));

        VocabularyExport {
            version: FORMAT_VERSION,
            learning_words,
            mastered_words,
        }
    }

    pub fn export_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    /// Replace the current state with an export. Mastered entries win
    /// when a malformed input names a word in both lists.
    pub fn import(&mut self, export: VocabularyExport) {
        self.items.clear();
        for (word, meta) in export.learning_words {
            self.items
                .insert(normalize(&word), (VocabStatus::Learning, meta));
        }
        for (word, meta) in export.mastered_words {
            self.items
                .insert(normalize(&word), (VocabStatus::Mastered, meta));
        }
    }

    /// Parse and import a JSON export. The legacy flat word-array
    /// format is accepted as an all-learning list. Parsing happens
    /// fully before any mutation, so a malformed file leaves the
    /// current state untouched.
    pub fn import_json(&mut self, json: &str) -> StoreResult<(usize, usize)> {
        let export = parse_export(json)?;
        let counts = (export.learning_words.len(), export.mastered_words.len());
        self.import(export);
        Ok(counts)
    }
}

impl Default for VocabularyStore {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_export(json: &str) -> StoreResult<VocabularyExport> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| StoreError::InvalidVocabulary(e.to_string()))?;

    // Legacy format: a bare array of words, all treated as learning.
    if let Some(words) = value.as_array() {
        let mut learning_words = Vec::new();
        for entry in words {
            let word = entry.as_str().ok_or_else(|| {
                StoreError::InvalidVocabulary("legacy array entries must be strings".to_string())
            })?;
            learning_words.push((
                word.to_string(),
                VocabEntryMeta {
                    added_date: now(),
                    ..Default::default()
                },
            ));
        }
        return Ok(VocabularyExport {
            version: FORMAT_VERSION,
            learning_words,
            mastered_words: Vec::new(),
        });
    }

    serde_json::from_value(value).map_err(|e| StoreError::InvalidVocabulary(e.to_string()))
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(store: &VocabularyStore) -> HashSet<(String, VocabStatus)> {
        let export = store.export();
        export
            .learning_words
            .iter()
            .map(|(w, _)| (w.clone(), VocabStatus::Learning))
            .chain(
                export
                    .mastered_words
                    .iter()
                    .map(|(w, _)| (w.clone(), VocabStatus::Mastered)),
            )
            .collect()
    }

    #[test]
    fn one_status_per_word() {
        let mut store = VocabularyStore::new();
        assert!(store.add_learning("Ephemeral", None, None));
        assert!(!store.add_learning("ephemeral", None, None));
        assert_eq!(store.status("ephemeral"), Some(VocabStatus::Learning));

        assert!(store.mark_mastered("ephemeral"));
        assert_eq!(store.status("ephemeral"), Some(VocabStatus::Mastered));
        assert_eq!(store.len(), 1);
        assert!(store.learning_set().is_empty());

        assert!(store.add_learning("ephemeral", None, None));
        assert_eq!(store.status("ephemeral"), Some(VocabStatus::Learning));
    }

    #[test]
    fn export_import_round_trip() {
        let mut store = VocabularyStore::new();
        store.add_learning("serendipity", Some("机缘".to_string()), None);
        store.add_learning("ubiquitous", None, None);
        store.mark_mastered("the");
        let before = pairs(&store);

        let json = store.export_json().unwrap();
        let mut restored = VocabularyStore::new();
        restored.import_json(&json).unwrap();

        assert_eq!(pairs(&restored), before);
    }

    #[test]
    fn legacy_flat_array_becomes_learning() {
        let mut store = VocabularyStore::new();
        let (learning, mastered) = store
            .import_json(r#"["alpha", "beta", "gamma"]"#)
            .unwrap();

        assert_eq!((learning, mastered), (3, 0));
        assert_eq!(store.status("beta"), Some(VocabStatus::Learning));
    }

    #[test]
    fn malformed_import_leaves_state_untouched() {
        let mut store = VocabularyStore::new();
        store.add_learning("keeper", None, None);

        assert!(store.import_json("{not json").is_err());
        assert!(store.import_json(r#"["ok", 42]"#).is_err());

        assert_eq!(store.len(), 1);
        assert_eq!(store.status("keeper"), Some(VocabStatus::Learning));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocabulary.json");

        let mut store = VocabularyStore::new();
        store.add_learning("persist", None, None);
        store.mark_mastered("done");
        store.save(&path).unwrap();

        let loaded = VocabularyStore::load(&path).unwrap();
        assert_eq!(pairs(&loaded), pairs(&store));

        let missing = VocabularyStore::load(dir.path().join("nope.json")).unwrap();
        assert!(missing.is_empty());
    }
}
