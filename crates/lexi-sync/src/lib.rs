mod client;
mod merge;

pub use client::DriveSyncClient;
pub use merge::merge_vocabularies;

use anyhow::Result;
use lexi_types::VocabularyExport;

/// Two-way vocabulary sync: pull the drive copy, merge it with the
/// local state (local wins conflicts), push the merged result back.
/// Returns the merged vocabulary for the caller to persist locally.
pub async fn sync_vocabulary(
    client: &DriveSyncClient,
    local: &VocabularyExport,
) -> Result<VocabularyExport> {
    let merged = match client.pull().await? {
        Some(remote) => merge_vocabularies(local, &remote),
        None => local.clone(),
    };

    client.push(&merged).await?;
    Ok(merged)
}
