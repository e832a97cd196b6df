use std::sync::Arc;

use lexi_store::VocabularyStore;
use lexi_sync::DriveSyncClient;

use crate::state::AppState;

pub async fn run(state: Arc<AppState>) -> anyhow::Result<()> {
    let (sync_config, vocabulary_path) = {
        let config = state.config.read().await;
        (config.sync.clone(), config.storage.vocabulary_path.clone())
    };

    if !sync_config.enabled {
        anyhow::bail!("Sync is disabled; enable it in the config profile first");
    }
    if sync_config.token.is_empty() {
        anyhow::bail!("No drive token configured (set LEXI_SYNC_TOKEN)");
    }

    let mut store = VocabularyStore::load(&vocabulary_path)?;
    let client = DriveSyncClient::new(sync_config.base_url, sync_config.token);

    let merged = lexi_sync::sync_vocabulary(&client, &store.export()).await?;
    let (learning, mastered) = (merged.learning_words.len(), merged.mastered_words.len());

    store.import(merged);
    store.save(&vocabulary_path)?;
    println!("Synced: {learning} learning, {mastered} mastered");

    Ok(())
}
