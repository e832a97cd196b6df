use anyhow::{Context, Result};
use lexi_types::VocabularyExport;

#[derive(Clone)]
pub struct DriveSyncClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl DriveSyncClient {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            base_url,
            token,
            client: reqwest::Client::new(),
        }
    }

    fn vocabulary_url(&self) -> String {
        format!("{}/vocabulary", self.base_url.trim_end_matches('/'))
    }

    /// Fetch the drive copy of the vocabulary. `None` when the user
    /// has never synced before.
    pub async fn pull(&self) -> Result<Option<VocabularyExport>> {
        let response = self
            .client
            .get(self.vocabulary_url())
            .bearer_auth(&self.token)
            .send()
            .await
            .context("Failed to reach the drive")?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            anyhow::bail!("Drive returned status {}", response.status());
        }

        let export = response
            .json::<VocabularyExport>()
            .await
            .context("Failed to parse drive vocabulary payload")?;
        Ok(Some(export))
    }

    pub async fn push(&self, export: &VocabularyExport) -> Result<()> {
        let response = self
            .client
            .put(self.vocabulary_url())
            .bearer_auth(&self.token)
            .json(export)
            .send()
            .await
            .context("Failed to reach the drive")?;

        if !response.status().is_success() {
            anyhow::bail!("Drive rejected vocabulary upload: {}", response.status());
        }
        Ok(())
    }
}
