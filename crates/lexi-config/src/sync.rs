use std::env;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    false
}

fn default_base_url() -> String {
    "https://drive.lexi.app/api/v1".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub token: String,
}

impl SyncConfig {
    pub fn new() -> Self {
        let token = env::var("LEXI_SYNC_TOKEN").unwrap_or_default();

        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            token,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            token: String::new(),
        }
    }
}
