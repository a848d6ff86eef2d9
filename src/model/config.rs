use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Override for the directory holding state.json
    #[serde(default)]
    pub data_dir: Option<String>,
    /// Idle time after the last change before the TUI writes state to disk
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,
    /// Maximum number of activity log entries kept
    #[serde(default = "default_log_limit")]
    pub log_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: None,
            save_debounce_ms: default_save_debounce_ms(),
            log_limit: default_log_limit(),
        }
    }
}

fn default_save_debounce_ms() -> u64 {
    500
}

fn default_log_limit() -> usize {
    1000
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Theme slot → `#RRGGBB`, applied in file order
    #[serde(default)]
    pub colors: IndexMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: IndexMap::new(),
        }
    }
}
