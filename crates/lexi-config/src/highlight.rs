use serde::{Deserialize, Serialize};

fn default_level() -> String {
    "intermediate".to_string()
}

fn default_mode() -> String {
    "unknown".to_string()
}

fn default_frequency_list() -> String {
    "frequency.txt".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlightConfig {
    /// Difficulty threshold: common/beginner/intermediate/advanced/expert
    #[serde(default = "default_level")]
    pub level: String,
    /// Highlight mode: unknown/difficult/all
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Frequency-ordered word list the difficulty tiers are built from
    #[serde(default = "default_frequency_list")]
    pub frequency_list: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            mode: default_mode(),
            frequency_list: default_frequency_list(),
        }
    }
}
