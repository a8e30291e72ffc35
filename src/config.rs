use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "backlog";
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the configured username.
pub const USERNAME_ENV: &str = "BACKLOG_USER";

fn default_backup_count() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Author stamped onto log entries. `BACKLOG_USER` takes precedence.
    pub username: Option<String>,
    /// Path of the active backlog document.
    pub document: Option<PathBuf>,
    /// Optional archive document for completed stories.
    pub archive: Option<PathBuf>,
    /// Numbered backups kept of the active document before each overwrite.
    #[serde(default = "default_backup_count")]
    pub backup_count: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            username: None,
            document: None,
            archive: None,
            backup_count: default_backup_count(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the user's config directory.
    /// Returns default config if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("failed to load config, using defaults: {e:#}");
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save the current configuration to disk.
    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// The effective username: environment override first, config field
    /// second, absent otherwise.
    pub fn resolve_username(&self) -> Option<String> {
        std::env::var(USERNAME_ENV)
            .ok()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .or_else(|| self.username.clone())
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
