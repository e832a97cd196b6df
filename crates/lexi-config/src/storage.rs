use serde::{Deserialize, Serialize};

fn default_chunk_cache_path() -> String {
    "lexi-chunks.db".to_string()
}

fn default_word_db_path() -> String {
    "lexi-words.db".to_string()
}

fn default_vocabulary_path() -> String {
    "vocabulary.json".to_string()
}

fn default_front_cache_capacity() -> usize {
    10_000
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageConfig {
    /// Chunk blob cache, distinct from the word lookup store
    #[serde(default = "default_chunk_cache_path")]
    pub chunk_cache_path: String,
    #[serde(default = "default_word_db_path")]
    pub word_db_path: String,
    #[serde(default = "default_vocabulary_path")]
    pub vocabulary_path: String,
    #[serde(default = "default_front_cache_capacity")]
    pub front_cache_capacity: usize,
}

impl StorageConfig {
    pub fn in_dir(dir: &str) -> Self {
        let dir = dir.trim_end_matches('/');
        Self {
            chunk_cache_path: format!("{dir}/{}", default_chunk_cache_path()),
            word_db_path: format!("{dir}/{}", default_word_db_path()),
            vocabulary_path: format!("{dir}/{}", default_vocabulary_path()),
            front_cache_capacity: default_front_cache_capacity(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            chunk_cache_path: default_chunk_cache_path(),
            word_db_path: default_word_db_path(),
            vocabulary_path: default_vocabulary_path(),
            front_cache_capacity: default_front_cache_capacity(),
        }
    }
}
