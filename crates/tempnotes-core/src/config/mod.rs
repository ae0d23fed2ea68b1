use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::note::{NoteStore, StorageLocation};
use crate::util::expand_home;

/// Root configuration for tempnotes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[derive(Default)]
pub struct Config {
    pub storage: StorageConfig,
}

impl Config {
    /// Storage location with `~/` expanded.
    pub fn storage_location(&self) -> StorageLocation {
        StorageLocation::new(expand_home(&self.storage.dir), self.storage.file_name.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    pub dir: String,
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: "~/.mcp_config".to_string(),
            file_name: "temp_notes.txt".to_string(),
        }
    }
}

/// Load config from `TEMPNOTES_CONFIG` (full JSON) or the config file, then
/// apply individual env overrides.
pub fn load_config_from_env() -> Config {
    let mut cfg = match std::env::var("TEMPNOTES_CONFIG") {
        Ok(json) if !json.trim().is_empty() => match serde_json::from_str::<Config>(&json) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("Failed to parse TEMPNOTES_CONFIG: {}", e);
                tracing::warn!("Using default configuration.");
                Config::default()
            }
        },
        _ => load_config(None),
    };

    apply_env_overrides(&mut cfg);
    cfg
}

/// Apply `TEMPNOTES_DIR` and `TEMPNOTES_FILE` overrides.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("TEMPNOTES_DIR") {
        if !v.is_empty() {
            cfg.storage.dir = v;
        }
    }
    if let Ok(v) = std::env::var("TEMPNOTES_FILE") {
        if !v.is_empty() {
            cfg.storage.file_name = v;
        }
    }
}

/// Get the default configuration file path.
pub fn get_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mcp_config")
        .join("tempnotes.json")
}

/// Load configuration from file or create default.
pub fn load_config(config_path: Option<&Path>) -> Config {
    let path = config_path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(get_config_path);

    if path.exists() {
        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Config>(&content) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to parse config from {}: {}", path.display(), e);
                    tracing::warn!("Using default configuration.");
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config from {}: {}", path.display(), e);
                tracing::warn!("Using default configuration.");
            }
        }
    }

    Config::default()
}

/// Save configuration to file.
pub fn save_config(config: &Config, config_path: Option<&Path>) -> Result<(), ConfigError> {
    let path = config_path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(get_config_path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::Invalid(e.to_string()))?;
    }

    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json).map_err(|e| ConfigError::Invalid(e.to_string()))?;
    Ok(())
}

/// Write `config` to the config file and create its note directory.
///
/// Refuses to overwrite an existing file unless `force` is set. Returns the
/// path written.
pub async fn init_config(
    config: &Config,
    config_path: Option<&Path>,
    force: bool,
) -> crate::error::Result<PathBuf> {
    let path = config_path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(get_config_path);

    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path).into());
    }

    save_config(config, Some(&path))?;
    NoteStore::new(config.storage_location())
        .ensure_storage_ready()
        .await?;

    tracing::info!("Wrote config to {}", path.display());
    Ok(path)
}
