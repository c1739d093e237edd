/// Configuration for the kanban store.
/// Reads config.json from ~/.config/kanban/config.json (or platform equivalent).
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanConfig {
    /// Directory holding one JSON file per stored key.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Lists created for a board that has no stored data yet.
    #[serde(default = "default_lists")]
    pub default_lists: Vec<String>,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kanban")
}

fn default_lists() -> Vec<String> {
    vec!["To Do".to_string(), "In Progress".to_string(), "Done".to_string()]
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_lists: default_lists(),
        }
    }
}

/// Default config path: ~/.config/kanban/config.json
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kanban")
        .join("config.json")
}

/// Load config from path. Returns defaults if the file is missing or invalid.
pub fn load_config(path: &Path) -> KanbanConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("[kanban.config] Failed to parse config {}: {}", path.display(), e);
            KanbanConfig::default()
        }),
        Err(_) => {
            log::info!("[kanban.config] No config at {}, using defaults", path.display());
            KanbanConfig::default()
        }
    }
}

/// Write config as pretty JSON, creating parent directories.
pub fn save_config(path: &Path, config: &KanbanConfig) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)
}
