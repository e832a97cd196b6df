use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://data.lexi.app/dictionary".to_string()
}

fn default_manifest_file() -> String {
    "manifest.json".to_string()
}

fn default_priority_chunks() -> u32 {
    2
}

fn default_chunk_delay_ms() -> u64 {
    100
}

fn default_download_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    /// Base URL the manifest and chunk files are served from
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,
    /// Chunks loaded before the app is considered usable
    #[serde(default = "default_priority_chunks")]
    pub priority_chunks: u32,
    /// Pause between background chunk loads
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl LoaderConfig {
    pub fn manifest_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.manifest_file)
    }

    pub fn chunk_url(&self, filename: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), filename)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            manifest_file: default_manifest_file(),
            priority_chunks: default_priority_chunks(),
            chunk_delay_ms: default_chunk_delay_ms(),
            download_timeout_secs: default_download_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}
