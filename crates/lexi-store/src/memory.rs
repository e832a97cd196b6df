use lexi_types::WordRecord;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::StoreResult;
use crate::row;

/// The live in-process word table the progressive loader feeds.
///
/// Backed by an in-memory database so a chunk's rows become visible to
/// queries exactly when its insertion transaction commits.
pub struct MemoryWordStore {
    conn: Connection,
}

impl MemoryWordStore {
    pub fn new() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(row::WORD_TABLE_SCHEMA)?;
        Ok(Self { conn })
    }

    /// Upsert a decoded chunk's rows in one transaction.
    pub fn insert_batch(&mut self, records: &[WordRecord]) -> StoreResult<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(row::WORD_UPSERT)?;
            for record in records {
                row::bind_record(&mut stmt, record)?;
                inserted += 1;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    pub fn get(&self, word_lower: &str) -> StoreResult<Option<WordRecord>> {
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

    pub fn len(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Stable page of rows for the bulk migration into the direct
    /// store.
    pub fn page(&self, offset: u64, limit: u64) -> StoreResult<Vec<WordRecord>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {} FROM words ORDER BY word_lower LIMIT ?1 OFFSET ?2",
            row::WORD_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![limit as i64, offset as i64], row::record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(word: &str, translation: &str) -> WordRecord {
        WordRecord {
            translation: translation.to_string(),
            ..WordRecord::new(word)
        }
    }

    #[test]
    fn batch_insert_then_lookup() {
        let mut store = MemoryWordStore::new().unwrap();
        store
            .insert_batch(&[record("Hello", "你好"), record("world", "世界")])
            .unwrap();

        assert_eq!(store.len().unwrap(), 2);
        let hello = store.get("hello").unwrap().unwrap();
        assert_eq!(hello.word, "Hello");
        assert_eq!(hello.translation, "你好");
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn reinsert_does_not_duplicate() {
        let mut store = MemoryWordStore::new().unwrap();
        let batch = vec![record("hello", "你好")];
        store.insert_batch(&batch).unwrap();
        store.insert_batch(&batch).unwrap();

        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn paging_is_stable_and_complete() {
        let mut store = MemoryWordStore::new().unwrap();
        let words: Vec<WordRecord> = (0..25)
            .map(|i| WordRecord::new(&format!("word{i:02}")))
            .collect();
        store.insert_batch(&words).unwrap();

        let mut seen = Vec::new();
        let mut offset = 0;
        loop {
            let page = store.page(offset, 10).unwrap();
            if page.is_empty() {
                break;
            }
            offset += page.len() as u64;
            seen.extend(page.into_iter().map(|r| r.word_lower));
        }

        assert_eq!(seen.len(), 25);
        let mut sorted = seen.clone();
        sorted.sort();
        assert_eq!(seen, sorted);
    }
}
