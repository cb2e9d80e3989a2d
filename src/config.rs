//! Application configuration management.
//!
//! The config file carries an optional spreadsheet document id override.
//! Persisted state lives in the platform data/cache directories:
//! selection at `<data>/vaultcache/selected_items.json`, weapon cache at
//! `<cache>/vaultcache/weapon_data.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data/cache directory paths
const APP_NAME: &str = "vaultcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Persisted selection file name
const SELECTION_FILE: &str = "selected_items.json";

/// Persisted weapon cache file name
const CACHE_FILE: &str = "weapon_data.json";

/// Document id of the community weapon spreadsheet.
const DEFAULT_SHEET_ID: &str = "1JM-0SlxVDAi-C6rGVlLxa-J1WGewEeL8Qvq4htWZHhY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub sheet_id: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// The spreadsheet document id to fetch from.
    pub fn sheet_id(&self) -> &str {
        self.sheet_id.as_deref().unwrap_or(DEFAULT_SHEET_ID)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn selection_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(SELECTION_FILE))
    }

    pub fn cache_path() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join(CACHE_FILE))
    }
}
