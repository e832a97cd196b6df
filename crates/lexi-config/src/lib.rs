use std::env;

use serde::{Deserialize, Serialize};

use self::highlight::HighlightConfig;
use self::loader::LoaderConfig;
use self::storage::StorageConfig;
use self::sync::SyncConfig;

pub mod highlight;
pub mod loader;
pub mod storage;
pub mod sync;

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub loader: LoaderConfig,
    pub storage: StorageConfig,
    pub highlight: HighlightConfig,
    pub sync: SyncConfig,
}

impl Config {
    pub fn new() -> Self {
        let mut loader = LoaderConfig::default();

        if let Ok(url) = env::var("LEXI_DATA_URL") {
            loader.base_url = url;
        }
        if let Ok(secs) = env::var("LEXI_DOWNLOAD_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                loader.download_timeout_secs = secs;
            }
        }

        let mut storage = StorageConfig::default();
        if let Ok(dir) = env::var("LEXI_DATA_DIR") {
            storage = StorageConfig::in_dir(&dir);
        }

        Config {
            loader,
            storage,
            highlight: HighlightConfig::default(),
            sync: SyncConfig::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            storage: StorageConfig::default(),
            highlight: HighlightConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_blobs_gain_new_sections() {
        // A persisted config from before the sync section existed must
        // still deserialize, picking up defaults for what it lacks.
        let json = r#"{"loader": {"priorityChunks": 3}}"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.loader.priority_chunks, 3);
        assert!(!config.sync.enabled);
        assert_eq!(
            config.highlight.level,
            HighlightConfig::default().level
        );
    }
}
