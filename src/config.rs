//! Configuration types and loading.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// User configuration, JSON on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the task file read at startup and written on save.
    pub tasks_file: PathBuf,

    /// Log level name (TRACE, DEBUG, INFO, WARN, ERROR).
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_file: PathBuf::from("tasks.txt"),
            log_level: None,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain: explicit path (errors are
    /// fatal), then `./deadliner.json`, then the user config dir, then
    /// defaults. A broken non-explicit file logs a warning and falls
    /// through.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()));
        }

        let local_config = PathBuf::from("deadliner.json");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("deadliner").join("config.json");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_json::from_str(&content).context("Failed to parse config file")?;
        info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
