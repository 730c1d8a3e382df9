use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::models::RECENT_LIMIT;

const APP_NAME: &str = "c2e";
const CONFIG_FILE: &str = "config.json";

/// Keys of the three top-level records in the local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageKeys {
    pub projects_key: String,
    pub settings_key: String,
    pub recent_key: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            projects_key: "c2e_projects".to_string(),
            settings_key: "c2e_settings".to_string(),
            recent_key: "c2e_recent".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudioConfig {
    pub storage: StorageKeys,
    /// Project names are truncated to this many characters.
    pub max_project_name_length: usize,
    /// Number of ids kept in the recent list.
    pub recent_limit: usize,
    /// Seconds between autosave ticks.
    pub autosave_interval_secs: u64,
    /// Directory holding the database file. Platform data dir when unset.
    pub data_dir: Option<PathBuf>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            storage: StorageKeys::default(),
            max_project_name_length: 50,
            recent_limit: RECENT_LIMIT,
            autosave_interval_secs: 60,
            data_dir: None,
        }
    }
}

impl StudioConfig {
    /// Reads `config.json` from the user config directory, falling back to
    /// defaults when it is missing or unreadable.
    pub fn load() -> Self {
        match config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default config: {:#}", e);
                Self::default()
            }
        }
    }

    /// Reads a config file. A missing file yields the defaults; missing keys
    /// keep their default values.
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Invalid config in {}", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read {}", path.display())),
        }
    }

    /// Writes the config as pretty JSON to the user config directory and
    /// returns the path written.
    pub fn save(&self) -> Result<PathBuf> {
        let path = config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create {}", dir.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Cannot write {}", path.display()))
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs.max(1))
    }
}

/// `<config dir>/c2e/config.json`.
pub fn config_path() -> Result<PathBuf> {
    let dir = config_dir().ok_or_else(|| anyhow::anyhow!("No config directory on this platform"))?;
    Ok(dir.join(APP_NAME).join(CONFIG_FILE))
}
