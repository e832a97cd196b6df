use std::sync::Arc;

use kanal::AsyncReceiver;
use lexi_core::WordDatabase;
use lexi_loader::ProgressiveLoader;
use lexi_store::{DirectWordStore, MemoryWordStore};
use lexi_types::LoaderEvent;
use tokio::signal;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub async fn run(state: Arc<AppState>) -> anyhow::Result<()> {
    let (loader_config, storage) = {
        let config = state.config.read().await;
        (config.loader.clone(), config.storage.clone())
    };

    let store = Arc::new(Mutex::new(MemoryWordStore::new()?));
    let (event_tx, event_rx) = kanal::bounded_async(256);
    let progress = tokio::spawn(progress_loop(event_rx));

    let mut loader = ProgressiveLoader::new(loader_config.clone(), store.clone(), event_tx);
    loader.open_cache(&storage.chunk_cache_path);
    loader.initialize().await?;

    // Blocking phase: with the priority chunks resident the common
    // words are already queryable.
    let priority = loader_config.priority_chunks;
    loader.load_priority_chunks(priority).await?;
    tracing::info!("Priority chunks loaded, continuing in the background");

    let cancel = CancellationToken::new();
    let background_cancel = cancel.child_token();
    let mut background = tokio::spawn(async move {
        tokio::select! {
            result = loader.load_remaining_chunks(priority + 1) => {
                if let Err(e) = result {
                    tracing::error!("Background chunk loading stopped: {}", e);
                }
            }
            _ = background_cancel.cancelled() => {
                tracing::info!("Background loading cancelled");
            }
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            cancel.cancel();
            let _ = (&mut background).await;
            return Ok(());
        }
        result = &mut background => {
            result?;
        }
    }

    // Migrate the loaded table into the persistent direct store so
    // later sessions answer lookups without re-downloading.
    let direct = DirectWordStore::open(&storage.word_db_path, storage.front_cache_capacity)?;
    let db = WordDatabase::new(direct, store);
    let imported = db.initialize().await?;
    tracing::info!("Direct word store ready ({} rows imported)", imported);

    progress.await?;
    Ok(())
}

async fn progress_loop(event_rx: AsyncReceiver<LoaderEvent>) {
    while let Ok(event) = event_rx.recv().await {
        match event {
            LoaderEvent::Progress {
                percent,
                loaded_bytes,
                total_bytes,
                from_cache,
                ..
            } => {
                tracing::info!(
                    "Loading dictionary: {}% ({}/{} bytes, {})",
                    percent,
                    loaded_bytes,
                    total_bytes,
                    if from_cache { "cache" } else { "download" }
                );
            }
            LoaderEvent::ChunkLoaded {
                chunk_number,
                word_count,
                from_cache,
            } => {
                tracing::debug!(
                    "Chunk {} loaded: {} words ({})",
                    chunk_number,
                    word_count,
                    if from_cache { "cache" } else { "download" }
                );
            }
            LoaderEvent::Complete { total_words } => {
                tracing::info!("Dictionary complete: {} words", total_words);
            }
            LoaderEvent::Error {
                chunk_number,
                message,
            } => {
                tracing::warn!(
                    "Chunk {} failed, its words will resolve as unknown: {}",
                    chunk_number,
                    message
                );
            }
        }
    }
}
