use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use lexi_lemma::{Lemmatizer, exchange_lemma};
use lexi_store::{DirectWordStore, MemoryWordStore, StoreError};
use lexi_types::{CacheStats, WordRecord};
use tokio::sync::Mutex;

use crate::remote::{RemoteError, RemoteWordSource};

/// Inputs above this size take the store's batched lookup path.
const BATCH_THRESHOLD: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("word database queried before initialization completed")]
    NotReady,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Single entry point for word lookups: direct store, then the
/// loader-fed in-memory store, then an optional remote stub.
///
/// "Not found" is a value, never an error. Querying before
/// [`initialize`](Self::initialize) completes is a contract violation
/// and fails loudly.
pub struct WordDatabase {
    direct: Mutex<DirectWordStore>,
    memory: Arc<Mutex<MemoryWordStore>>,
    remote: Option<Box<dyn RemoteWordSource>>,
    ready: AtomicBool,
}

impl WordDatabase {
    pub fn new(direct: DirectWordStore, memory: Arc<Mutex<MemoryWordStore>>) -> Self {
        Self {
            direct: Mutex::new(direct),
            memory,
            remote: None,
            ready: AtomicBool::new(false),
        }
    }

    pub fn with_remote(mut self, remote: Box<dyn RemoteWordSource>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Run the one-time migration out of the in-memory store and mark
    /// the facade ready. Returns the number of imported rows.
    pub async fn initialize(&self) -> Result<u64, DbError> {
        let imported = {
            let memory = self.memory.lock().await;
            self.direct
                .lock()
                .await
                .import_from_memory(&memory, |done, total| {
                    if done % 10_000 == 0 {
                        tracing::debug!("Word import progress: {}/{}", done, total);
                    }
                })
                .await?
        };
        self.ready.store(true, Ordering::SeqCst);
        Ok(imported)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn check_ready(&self) -> Result<(), DbError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(DbError::NotReady)
        }
    }

    /// Case-insensitive lookup through every layer.
    pub async fn query(&self, word: &str) -> Result<Option<WordRecord>, DbError> {
        self.check_ready()?;
        let key = word.trim().to_lowercase();

        if let Some(record) = self.direct.lock().await.query_word(&key)? {
            return Ok(Some(record));
        }
        if let Some(record) = self.memory.lock().await.get(&key)? {
            return Ok(Some(record));
        }
        if let Some(remote) = &self.remote {
            match remote.fetch_word(&key).await {
                Ok(record) => return Ok(record),
                Err(e) => {
                    // The stub endpoint failing is a miss, not an error.
                    tracing::debug!("Remote lookup failed for '{}': {}", key, e);
                }
            }
        }
        Ok(None)
    }

    /// Resolve `word` to a headword record.
    ///
    /// A direct hit whose `exchange` field names a lemma is
    /// authoritative: the lemma's record is returned when it exists.
    /// Otherwise the rule cascade's candidates are tried in order.
    pub async fn lookup_with_lemma(
        &self,
        word: &str,
        lemmatizer: &Lemmatizer,
    ) -> Result<Option<WordRecord>, DbError> {
        if let Some(record) = self.query(word).await? {
            if let Some(lemma) = exchange_lemma(&record.word_lower, &record.exchange) {
                if let Some(base) = self.query(&lemma).await? {
                    return Ok(Some(base));
                }
            }
            return Ok(Some(record));
        }

        for candidate in lemmatizer.lemmatize(word).into_iter().skip(1) {
            if let Some(record) = self.query(&candidate).await? {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// One entry per unique input word. Large inputs use the store's
    /// batched path (which skips the remote stub); small inputs fall
    /// back to individual queries.
    pub async fn batch_query(
        &self,
        words: &[String],
    ) -> Result<HashMap<String, Option<WordRecord>>, DbError> {
        self.check_ready()?;
        let mut results = HashMap::new();

        let unique: Vec<String> = {
            let mut seen = std::collections::HashSet::new();
            words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| seen.insert(w.clone()))
                .collect()
        };

        if unique.len() > BATCH_THRESHOLD {
            let batch = self.direct.lock().await.query_words_batch(&unique)?;
            for (word, record) in batch {
                let record = match record {
                    Some(record) => Some(record),
                    None => self.memory.lock().await.get(&word)?,
                };
                results.insert(word, record);
            }
        } else {
            for word in unique {
                let record = self.query(&word).await?;
                results.insert(word, record);
            }
        }
        Ok(results)
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.direct.lock().await.cache_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(word: &str, exchange: &str) -> WordRecord {
        WordRecord {
            exchange: exchange.to_string(),
            ..WordRecord::new(word)
        }
    }

    async fn seeded_db(words: &[(&str, &str)]) -> WordDatabase {
        let mut memory = MemoryWordStore::new().unwrap();
        let records: Vec<WordRecord> = words.iter().map(|(w, e)| record(w, e)).collect();
        memory.insert_batch(&records).unwrap();

        let direct = DirectWordStore::open_in_memory(64).unwrap();
        let db = WordDatabase::new(direct, Arc::new(Mutex::new(memory)));
        db.initialize().await.unwrap();
        db
    }

    #[tokio::test]
    async fn querying_before_initialize_is_loud() {
        let memory = Arc::new(Mutex::new(MemoryWordStore::new().unwrap()));
        let direct = DirectWordStore::open_in_memory(64).unwrap();
        let db = WordDatabase::new(direct, memory);

        assert!(matches!(db.query("the").await, Err(DbError::NotReady)));
        assert!(matches!(
            db.batch_query(&["the".to_string()]).await,
            Err(DbError::NotReady)
        ));
    }

    #[tokio::test]
    async fn miss_is_a_value_not_an_error() {
        let db = seeded_db(&[("the", "")]).await;

        assert!(db.query("the").await.unwrap().is_some());
        assert!(db.query("zyzzyva").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn falls_back_to_memory_for_rows_added_after_import() {
        let db = seeded_db(&[("the", "")]).await;

        // A background chunk lands after the migration ran.
        db.memory
            .lock()
            .await
            .insert_batch(&[record("latecomer", "")])
            .unwrap();

        let hit = db.query("Latecomer").await.unwrap();
        assert_eq!(hit.unwrap().word_lower, "latecomer");
    }

    #[tokio::test]
    async fn exchange_lemma_outranks_cascade() {
        let db = seeded_db(&[("ran", "0:run"), ("run", ""), ("studies", "")]).await;
        let lemmatizer = Lemmatizer::new();

        let resolved = db.lookup_with_lemma("ran", &lemmatizer).await.unwrap();
        assert_eq!(resolved.unwrap().word_lower, "run");

        // No direct hit for "running": the cascade finds the headword.
        let resolved = db.lookup_with_lemma("running", &lemmatizer).await.unwrap();
        assert_eq!(resolved.unwrap().word_lower, "run");

        // Direct hit without an exchange lemma is returned as-is.
        let resolved = db.lookup_with_lemma("studies", &lemmatizer).await.unwrap();
        assert_eq!(resolved.unwrap().word_lower, "studies");
    }

    #[tokio::test]
    async fn batch_query_covers_both_paths() {
        let seeds: Vec<(String, String)> = (0..15)
            .map(|i| (format!("word{i:02}"), String::new()))
            .collect();
        let refs: Vec<(&str, &str)> = seeds
            .iter()
            .map(|(w, e)| (w.as_str(), e.as_str()))
            .collect();
        let db = seeded_db(&refs).await;

        // Small input: individual path.
        let small = db
            .batch_query(&["word00".to_string(), "nope".to_string()])
            .await
            .unwrap();
        assert_eq!(small.len(), 2);
        assert!(small["word00"].is_some());
        assert!(small["nope"].is_none());

        // Large input: store batch path, one entry per unique word.
        let mut large: Vec<String> = seeds.iter().map(|(w, _)| w.clone()).collect();
        large.push("word00".to_string());
        large.push("missing".to_string());
        let results = db.batch_query(&large).await.unwrap();
        assert_eq!(results.len(), 16);
        assert!(results["word14"].is_some());
        assert!(results["missing"].is_none());
    }
}
