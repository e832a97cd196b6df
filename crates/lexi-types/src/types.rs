use serde::{Deserialize, Serialize};

/// One dictionary entry.
///
/// `word_lower` is the lookup key in every store; the original casing is
/// kept only for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WordRecord {
    pub word: String,
    pub word_lower: String,
    pub phonetic: String,
    pub definition: String,
    pub translation: String,
    pub pos: String,
    /// Collins star rating, 0-5
    pub collins: u8,
    /// Oxford 3000 core word
    pub oxford: bool,
    /// Space-separated exam/level tags
    pub tag: String,
    /// BNC frequency rank, 0 = unknown, lower = more frequent
    pub bnc: u32,
    /// Contemporary corpus frequency rank, 0 = unknown
    pub frq: u32,
    /// Morphological forms, `tag:value` pairs separated by `/`
    pub exchange: String,
    pub detail: String,
    pub audio: String,
}

impl WordRecord {
    pub fn new(word: &str) -> Self {
        Self {
            word: word.to_string(),
            word_lower: word.to_lowercase(),
            ..Self::default()
        }
    }
}

/// One frequency-ordered partition of the dictionary.
///
/// Chunk 1 holds the most frequent words. `priority` mirrors
/// `chunk_number` in current data sets and is carried but never
/// interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkInfo {
    #[serde(rename = "chunkNumber")]
    pub chunk_number: u32,
    pub filename: String,
    #[serde(rename = "wordCount")]
    pub word_count: u32,
    #[serde(rename = "sizeBytes")]
    pub size_bytes: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub priority: u32,
}

/// Describes the full chunk set. Fetched once per session, cache-first;
/// immutable for the session's duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkManifest {
    pub version: String,
    #[serde(rename = "totalChunks")]
    pub total_chunks: u32,
    #[serde(rename = "totalWords")]
    pub total_words: u64,
    pub chunks: Vec<ChunkInfo>,
}

impl ChunkManifest {
    pub fn chunk(&self, chunk_number: u32) -> Option<&ChunkInfo> {
        self.chunks.iter().find(|c| c.chunk_number == chunk_number)
    }

    pub fn total_bytes(&self) -> u64 {
        self.chunks.iter().map(|c| c.size_bytes).sum()
    }
}

/// Which user list a word belongs to. A word is in at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabStatus {
    Learning,
    Mastered,
}

impl VocabStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VocabStatus::Learning => "learning",
            VocabStatus::Mastered => "mastered",
        }
    }
}

/// Per-word payload in the persisted vocabulary format.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VocabEntryMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(rename = "addedDate")]
    pub added_date: i64,
    #[serde(rename = "reviewCount")]
    pub review_count: u32,
    #[serde(rename = "lastReviewed", skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<i64>,
}

/// Wire/persisted shape of the user vocabulary. Also the cloud sync
/// payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VocabularyExport {
    pub version: u32,
    #[serde(rename = "learningWords", default)]
    pub learning_words: Vec<(String, VocabEntryMeta)>,
    #[serde(rename = "masteredWords", default)]
    pub mastered_words: Vec<(String, VocabEntryMeta)>,
}

/// Front-cache counters. Derived, reset by `clear_cache`, never
/// persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub total_queries: u64,
    pub cache_size: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            return 0.0;
        }
        self.hits as f64 / (self.hits + self.misses) as f64
    }
}

/// Progress notifications from the progressive loader.
///
/// For any chunk n: `ChunkLoaded(n)` precedes the `Progress` for n, and
/// all events for n precede events for n+1. `Complete` is last.
#[derive(Debug, Clone)]
pub enum LoaderEvent {
    Progress {
        loaded_chunks: u32,
        total_chunks: u32,
        loaded_bytes: u64,
        total_bytes: u64,
        percent: u32,
        from_cache: bool,
    },
    ChunkLoaded {
        chunk_number: u32,
        word_count: usize,
        from_cache: bool,
    },
    Complete {
        total_words: u64,
    },
    Error {
        chunk_number: u32,
        message: String,
    },
}
