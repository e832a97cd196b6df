use std::path::Path;

use lexi_types::ChunkManifest;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::StoreResult;

const MANIFEST_KEY: &str = "manifest";

/// Persistent chunk blob cache, keyed by chunk number and stamped with
/// the manifest version it was downloaded under.
///
/// Every write is best-effort: a failed save is logged and swallowed so
/// the loader keeps working with caching effectively disabled. Reads
/// degrade to a cache miss on any storage problem or version mismatch.
pub struct ChunkCache {
    conn: Connection,
}

impl ChunkCache {
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS chunks (
                chunk_number INTEGER NOT NULL PRIMARY KEY,
                version      TEXT NOT NULL,
                data         BLOB NOT NULL
            );
            CREATE TABLE IF NOT EXISTS meta (
                key   TEXT NOT NULL PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { conn })
    }

    pub fn save_chunk(&self, chunk_number: u32, data: &[u8], version: &str) {
        if let Err(e) = self.try_save_chunk(chunk_number, data, version) {
            tracing::warn!("Failed to cache chunk {}: {}", chunk_number, e);
        }
    }

    fn try_save_chunk(&self, chunk_number: u32, data: &[u8], version: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO chunks (chunk_number, version, data) VALUES (?1, ?2, ?3)",
            params![chunk_number, version, data],
        )?;
        Ok(())
    }

    /// Cached bytes for a chunk, or `None` on absence, version
    /// mismatch, or storage failure.
    pub fn load_chunk(&self, chunk_number: u32, expected_version: Option<&str>) -> Option<Vec<u8>> {
        match self.try_load_chunk(chunk_number) {
            Ok(Some((version, data))) => {
                if let Some(expected) = expected_version {
                    if version != expected {
                        tracing::debug!(
                            "Chunk {} cached under version {} (want {}), treating as miss",
                            chunk_number,
                            version,
                            expected
                        );
                        return None;
                    }
                }
                Some(data)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read cached chunk {}: {}", chunk_number, e);
                None
            }
        }
    }

    fn try_load_chunk(&self, chunk_number: u32) -> StoreResult<Option<(String, Vec<u8>)>> {
        let row = self
            .conn
            .query_row(
                "SELECT version, data FROM chunks WHERE chunk_number = ?1",
                params![chunk_number],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?)),
            )
            .optional()?;
        Ok(row)
    }

    pub fn save_manifest(&self, manifest: &ChunkManifest) {
        let result = serde_json::to_string(manifest)
            .map_err(crate::StoreError::from)
            .and_then(|json| {
                self.conn.execute(
                    "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
                    params![MANIFEST_KEY, json],
                )?;
                Ok(())
            });
        if let Err(e) = result {
            tracing::warn!("Failed to cache manifest: {}", e);
        }
    }

    pub fn load_manifest(&self) -> Option<ChunkManifest> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![MANIFEST_KEY],
                |row| row.get(0),
            )
            .optional()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to read cached manifest: {}", e);
                None
            });

        match json {
            Some(json) => match serde_json::from_str(&json) {
                Ok(manifest) => Some(manifest),
                Err(e) => {
                    tracing::warn!("Cached manifest is malformed, ignoring: {}", e);
                    None
                }
            },
            None => None,
        }
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.conn.execute("DELETE FROM chunks", [])?;
        self.conn.execute("DELETE FROM meta", [])?;
        Ok(())
    }
}
