use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use lexi_config::loader::LoaderConfig;
use lexi_store::{ChunkCache, MemoryWordStore};
use lexi_types::{ChunkManifest, LoaderEvent};
use tokio::sync::Mutex;

use crate::decode;
use crate::download::ChunkDownloader;
use crate::error::LoaderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Uninitialized,
    Initializing,
    Loading,
    Ready,
    Failed,
}

/// Orchestrates the chunk-by-chunk dictionary load: cache first,
/// network on miss, write-through, ordered progress events.
///
/// Chunks load in ascending numeric order and a chunk's words are
/// visible to queries before its events fire. A per-chunk failure is
/// reported and skipped, never aborting the sequence; the failed
/// chunk's words simply resolve as unknown until a retry.
pub struct ProgressiveLoader {
    config: LoaderConfig,
    downloader: ChunkDownloader,
    cache: Option<ChunkCache>,
    store: Arc<Mutex<MemoryWordStore>>,
    events: AsyncSender<LoaderEvent>,
    manifest: Option<ChunkManifest>,
    loaded: HashSet<u32>,
    loaded_bytes: u64,
    state: LoaderState,
}

impl ProgressiveLoader {
    pub fn new(
        config: LoaderConfig,
        store: Arc<Mutex<MemoryWordStore>>,
        events: AsyncSender<LoaderEvent>,
    ) -> Self {
        let downloader = ChunkDownloader::new(
            Duration::from_secs(config.download_timeout_secs),
            config.max_retries,
        );
        Self {
            config,
            downloader,
            cache: None,
            store,
            events,
            manifest: None,
            loaded: HashSet::new(),
            loaded_bytes: 0,
            state: LoaderState::Uninitialized,
        }
    }

    /// Attach an already-open chunk cache.
    pub fn attach_cache(&mut self, cache: ChunkCache) {
        self.cache = Some(cache);
    }

    /// Open the chunk cache at `path`. The loader works without a
    /// cache (every chunk downloads), so failure only logs.
    pub fn open_cache(&mut self, path: &str) {
        match ChunkCache::open(path) {
            Ok(cache) => self.cache = Some(cache),
            Err(e) => {
                tracing::warn!("Failed to open chunk cache at {}: {}, continuing without", path, e);
            }
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn manifest(&self) -> Option<&ChunkManifest> {
        self.manifest.as_ref()
    }

    pub fn loaded_chunks(&self) -> u32 {
        self.loaded.len() as u32
    }

    /// Resolve the manifest (cache first, then network with
    /// write-through) and emit the initial progress event.
    pub async fn initialize(&mut self) -> Result<(), LoaderError> {
        self.state = LoaderState::Initializing;

        let manifest = match self.cache.as_ref().and_then(|c| c.load_manifest()) {
            Some(manifest) => {
                tracing::info!("Using cached manifest, version {}", manifest.version);
                manifest
            }
            None => {
                let url = self.config.manifest_url();
                tracing::info!("Fetching manifest from {}", url);
                let manifest = match self.downloader.fetch_manifest(&url).await {
                    Ok(manifest) => manifest,
                    Err(e) => {
                        self.state = LoaderState::Failed;
                        return Err(e.into());
                    }
                };
                if let Some(cache) = &self.cache {
                    cache.save_manifest(&manifest);
                }
                manifest
            }
        };

        tracing::info!(
            "Dictionary manifest: {} chunks, {} words, version {}",
            manifest.total_chunks,
            manifest.total_words,
            manifest.version
        );
        self.manifest = Some(manifest);
        self.state = LoaderState::Loading;
        self.emit_progress(false).await;
        Ok(())
    }

    /// Load one chunk into the live store. Idempotent: an
    /// already-loaded chunk is a no-op returning `Ok(true)`.
    /// Per-chunk failures emit an error event and return `Ok(false)`.
    pub async fn load_chunk(&mut self, chunk_number: u32) -> Result<bool, LoaderError> {
        let manifest = self.manifest.clone().ok_or(LoaderError::NotInitialized)?;
        if self.loaded.contains(&chunk_number) {
            return Ok(true);
        }

        let Some(info) = manifest.chunk(chunk_number) else {
            self.emit_error(chunk_number, format!("chunk {} not in manifest", chunk_number))
                .await;
            return Ok(false);
        };

        let cached = self
            .cache
            .as_ref()
            .and_then(|c| c.load_chunk(chunk_number, Some(&manifest.version)));
        let from_cache = cached.is_some();

        let payload = match cached {
            Some(bytes) => bytes,
            None => {
                let url = self.config.chunk_url(&info.filename);
                match self.downloader.download_chunk(&url, info.size_bytes).await {
                    Ok(bytes) => {
                        if let Some(cache) = &self.cache {
                            cache.save_chunk(chunk_number, &bytes, &manifest.version);
                        }
                        bytes
                    }
                    Err(e) => {
                        tracing::warn!("Chunk {} failed to download: {}", chunk_number, e);
                        self.emit_error(chunk_number, e.to_string()).await;
                        return Ok(false);
                    }
                }
            }
        };

        let records = decode::merge_rows(decode::decode_rows(&payload));
        let word_count = records.len();
        if let Err(e) = self.store.lock().await.insert_batch(&records) {
            tracing::error!("Chunk {} failed to insert: {}", chunk_number, e);
            self.emit_error(chunk_number, e.to_string()).await;
            return Ok(false);
        }

        self.loaded.insert(chunk_number);
        self.loaded_bytes += info.size_bytes;
        tracing::debug!(
            "Chunk {} loaded ({} words, {})",
            chunk_number,
            word_count,
            if from_cache { "cache" } else { "download" }
        );

        self.emit(LoaderEvent::ChunkLoaded {
            chunk_number,
            word_count,
            from_cache,
        })
        .await;
        self.emit_progress(from_cache).await;

        if self.loaded.len() as u32 >= manifest.total_chunks {
            self.state = LoaderState::Ready;
            self.emit(LoaderEvent::Complete {
                total_words: manifest.total_words,
            })
            .await;
        }
        Ok(true)
    }

    /// Load chunks 1..=count, awaiting each in turn. This is the
    /// blocking phase that makes the app usable; the caller then
    /// schedules [`load_remaining_chunks`] in the background.
    ///
    /// [`load_remaining_chunks`]: Self::load_remaining_chunks
    pub async fn load_priority_chunks(&mut self, count: u32) -> Result<(), LoaderError> {
        let total = self
            .manifest
            .as_ref()
            .ok_or(LoaderError::NotInitialized)?
            .total_chunks;
        for n in 1..=count.min(total) {
            self.load_chunk(n).await?;
        }
        Ok(())
    }

    /// Load every chunk from `start` on, sequentially, with a short
    /// pause between chunks so a long tail load stays cooperative.
    pub async fn load_remaining_chunks(&mut self, start: u32) -> Result<(), LoaderError> {
        let total = self
            .manifest
            .as_ref()
            .ok_or(LoaderError::NotInitialized)?
            .total_chunks;
        let delay = Duration::from_millis(self.config.chunk_delay_ms);

        for n in start..=total {
            self.load_chunk(n).await?;
            if n < total && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        Ok(())
    }

    // The emitters take &mut self so loader futures stay Send: a shared
    // borrow would pin the non-Sync cache connection across an await.
    async fn emit_progress(&mut self, from_cache: bool) {
        let Some(manifest) = &self.manifest else {
            return;
        };
        let total_chunks = manifest.total_chunks;
        let total_bytes = manifest.total_bytes();
        let percent = if total_bytes == 0 {
            100
        } else {
            (self.loaded_bytes * 100 / total_bytes) as u32
        };
        self.emit(LoaderEvent::Progress {
            loaded_chunks: self.loaded.len() as u32,
            total_chunks,
            loaded_bytes: self.loaded_bytes,
            total_bytes,
            percent,
            from_cache,
        })
        .await;
    }

    async fn emit_error(&mut self, chunk_number: u32, message: String) {
        self.emit(LoaderEvent::Error {
            chunk_number,
            message,
        })
        .await;
    }

    async fn emit(&mut self, event: LoaderEvent) {
        // A dropped listener never blocks loading.
        let _ = self.events.send(event).await;
    }
}
