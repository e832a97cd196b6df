use std::collections::HashSet;
use std::path::Path;

use lexi_types::{CacheStats, WordRecord};
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::StoreResult;
use crate::front_cache::FrontCache;
use crate::memory::MemoryWordStore;
use crate::row;

const IMPORT_FLAG: &str = "import_complete";
const IMPORT_BATCH: u64 = 1000;
const YIELD_EVERY_BATCHES: u64 = 4;

/// Query-optimized persistent word store: one row per word keyed by
/// `word_lower`, fronted by a bounded in-memory cache so hot lookups
/// never touch storage.
pub struct DirectWordStore {
    conn: Connection,
    cache: FrontCache,
    hits: u64,
    misses: u64,
    total_queries: u64,
}

impl DirectWordStore {
    pub fn open<P: AsRef<Path>>(path: P, cache_capacity: usize) -> StoreResult<Self> {
        Self::init(Connection::open(path)?, cache_capacity)
    }

    pub fn open_in_memory(cache_capacity: usize) -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?, cache_capacity)
    }

    fn init(conn: Connection, cache_capacity: usize) -> StoreResult<Self> {
        conn.execute_batch(row::WORD_TABLE_SCHEMA)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS meta (key TEXT NOT NULL PRIMARY KEY, value TEXT NOT NULL)",
        )?;
        Ok(Self {
            conn,
            cache: FrontCache::new(cache_capacity),
            hits: 0,
            misses: 0,
            total_queries: 0,
        })
    }

    pub fn import_complete(&self) -> StoreResult<bool> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![IMPORT_FLAG],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.as_deref() == Some("1"))
    }

    /// One-time bulk copy out of the loader-fed store. A no-op when the
    /// completion flag is already set. Copies in fixed batches and
    /// yields back to the runtime periodically so a 760k-row import
    /// does not starve other tasks.
    pub async fn import_from_memory(
        &mut self,
        source: &MemoryWordStore,
        mut on_progress: impl FnMut(u64, u64),
    ) -> StoreResult<u64> {
        if self.import_complete()? {
            tracing::debug!("Word store import already complete, skipping");
            return Ok(0);
        }

        let total = source.len()?;
        if total == 0 {
            tracing::debug!("Source store is empty, nothing to import");
            return Ok(0);
        }
        let mut imported = 0u64;
        let mut batches = 0u64;

        loop {
            let page = source.page(imported, IMPORT_BATCH)?;
            if page.is_empty() {
                break;
            }

            let tx = self.conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(row::WORD_UPSERT)?;
                for record in &page {
                    row::bind_record(&mut stmt, record)?;
                }
            }
            tx.commit()?;

            imported += page.len() as u64;
            batches += 1;
            on_progress(imported, total);

            if batches % YIELD_EVERY_BATCHES == 0 {
                tokio::task::yield_now().await;
            }
        }

        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, '1')",
            params![IMPORT_FLAG],
        )?;
        tracing::info!("Imported {} words into the direct store", imported);
        Ok(imported)
    }

    /// Case-insensitive single-word lookup through the front cache.
    pub fn query_word(&mut self, word: &str) -> StoreResult<Option<WordRecord>> {
        let key = word.trim().to_lowercase();
        self.total_queries += 1;

        if let Some(record) = self.cache.get(&key) {
            self.hits += 1;
            return Ok(Some(record.clone()));
        }
        self.misses += 1;

        let record = self.select_one(&key)?;
        if let Some(record) = &record {
            self.cache.insert(key, record.clone());
        }
        Ok(record)
    }

    /// Batched lookup: cache hits answered immediately, all misses
    /// resolved in a single pass. Exactly one result per unique input
    /// word, input order preserved.
    pub fn query_words_batch(
        &mut self,
        words: &[String],
    ) -> StoreResult<Vec<(String, Option<WordRecord>)>> {
        let mut unique: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for word in words {
            let key = word.trim().to_lowercase();
            if seen.insert(key.clone()) {
                unique.push(key);
            }
        }

        let mut missing: Vec<String> = Vec::new();
        for key in &unique {
            self.total_queries += 1;
            if self.cache.get(key).is_some() {
                self.hits += 1;
            } else {
                self.misses += 1;
                missing.push(key.clone());
            }
        }

        if !missing.is_empty() {
            let placeholders = vec!["?"; missing.len()].join(", ");
            let sql = format!(
                "SELECT {} FROM words WHERE word_lower IN ({})",
                row::WORD_COLUMNS,
                placeholders
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let found = stmt
                .query_map(
                    rusqlite::params_from_iter(missing.iter()),
                    row::record_from_row,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            for record in found {
                self.cache.insert(record.word_lower.clone(), record);
            }
        }

        Ok(unique
            .into_iter()
            .map(|key| {
                let record = self.cache.get(&key).cloned();
                (key, record)
            })
            .collect())
    }

    fn select_one(&self, word_lower: &str) -> StoreResult<Option<WordRecord>> {
        let record = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM words WHERE word_lower = ?1",
                    row::WORD_COLUMNS
                ),
                params![word_lower],
                row::record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    pub fn word_count(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            total_queries: self.total_queries,
            cache_size: self.cache.len(),
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
        self.total_queries = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_memory(words: &[&str]) -> MemoryWordStore {
        let mut memory = MemoryWordStore::new().unwrap();
        let records: Vec<WordRecord> = words.iter().map(|w| WordRecord::new(w)).collect();
        memory.insert_batch(&records).unwrap();
        memory
    }

    #[tokio::test]
    async fn import_is_idempotent() {
        let memory = seeded_memory(&["alpha", "beta", "gamma"]);
        let mut store = DirectWordStore::open_in_memory(16).unwrap();

        let first = store.import_from_memory(&memory, |_, _| {}).await.unwrap();
        assert_eq!(first, 3);
        assert_eq!(store.word_count().unwrap(), 3);

        let second = store.import_from_memory(&memory, |_, _| {}).await.unwrap();
        assert_eq!(second, 0);
        assert_eq!(store.word_count().unwrap(), 3);
    }

    #[tokio::test]
    async fn query_populates_front_cache() {
        let memory = seeded_memory(&["alpha"]);
        let mut store = DirectWordStore::open_in_memory(16).unwrap();
        store.import_from_memory(&memory, |_, _| {}).await.unwrap();

        assert!(store.query_word("Alpha").unwrap().is_some());
        assert!(store.query_word("alpha").unwrap().is_some());
        assert!(store.query_word("missing").unwrap().is_none());

        let stats = store.cache_stats();
        assert_eq!(stats.total_queries, 3);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.cache_size, 1);

        store.clear_cache();
        assert_eq!(store.cache_stats(), CacheStats::default());
    }

    #[tokio::test]
    async fn batch_query_returns_one_result_per_unique_word() {
        let memory = seeded_memory(&["alpha", "beta"]);
        let mut store = DirectWordStore::open_in_memory(16).unwrap();
        store.import_from_memory(&memory, |_, _| {}).await.unwrap();

        // Warm the cache with one word so the batch mixes hit and miss.
        store.query_word("alpha").unwrap();

        let words: Vec<String> = ["Alpha", "beta", "alpha", "missing"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let results = store.query_words_batch(&words).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, "alpha");
        assert!(results[0].1.is_some());
        assert!(results[1].1.is_some());
        assert_eq!(results[2].0, "missing");
        assert!(results[2].1.is_none());
    }
}
