//! # Configuration
//!
//! Application settings live in a single YAML file at the root of the data
//! directory, next to the stored records:
//!
//! ```text
//! Pawfect Day/
//! ├── .pawfect_redirect   (optional, points at another data directory)
//! ├── pawfect.yaml        <- this module manages this file
//! ├── pawfect_pets.json
//! └── ...
//! ```
//!
//! ## YAML Format
//!
//! ```yaml
//! data_format_version: "1.0"
//! key_prefix: pawfect
//! history_retention_months: 1
//! log_level: info
//! ```
//!
//! Missing fields take their defaults, and a missing file is created with
//! the defaults on first start.

use anyhow::{Context, Result};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::DEFAULT_RETENTION_MONTHS;
use crate::storage::kv::validate_key;
use crate::storage::{StorageKeys, DEFAULT_KEY_PREFIX};

pub const CONFIG_FILE_NAME: &str = "pawfect.yaml";
pub const DATA_DIR_ENV: &str = "PAWFECT_DATA_DIR";
const DEFAULT_DIR_NAME: &str = "Pawfect Day";
const REDIRECT_FILE_NAME: &str = ".pawfect_redirect";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Data format version for future migrations
    pub data_format_version: String,
    /// Prepended to every storage key, e.g. "pawfect_pets"
    pub key_prefix: String,
    /// Calendar months of history to keep
    pub history_retention_months: u32,
    /// Default log filter when RUST_LOG is not set
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_format_version: "1.0".to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            history_retention_months: DEFAULT_RETENTION_MONTHS,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Read `pawfect.yaml` from `data_dir`, writing the defaults if it is missing
    pub fn load_or_create(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);

        if !path.exists() {
            let config = Self::default();
            config.save(data_dir)?;
            info!("Created default configuration at {}", path.display());
            return Ok(config);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Every storage key built from `key_prefix` must be a valid key
    pub fn validate(&self) -> Result<()> {
        let keys = self.storage_keys();
        for key in [
            &keys.pets,
            &keys.active_pet_index,
            &keys.last_reset_day,
            &keys.history,
        ] {
            if validate_key(key).is_err() {
                anyhow::bail!(
                    "key_prefix '{}' produces invalid storage key '{}'; \
                     use only letters, digits, '_', '-' and '.', not starting with '.'",
                    self.key_prefix,
                    key
                );
            }
        }
        Ok(())
    }

    /// Write the configuration atomically via a temp file
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;

        let path = data_dir.join(CONFIG_FILE_NAME);
        let temp_path = path.with_extension("yaml.tmp");
        let content = serde_yaml::to_string(self).context("Failed to serialize configuration")?;
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to move configuration into {}", path.display()))?;
        Ok(())
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(&self.key_prefix)
    }
}

/// Where the data lives: `$PAWFECT_DATA_DIR`, else `~/Documents/Pawfect Day`
/// (or wherever its redirect file points)
pub fn resolve_data_directory() -> Result<PathBuf> {
    let env_override = std::env::var(DATA_DIR_ENV).ok();
    let documents = dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")));
    resolve_data_directory_from(env_override, documents)
}

fn resolve_data_directory_from(
    env_override: Option<String>,
    documents_dir: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = env_override.filter(|d| !d.trim().is_empty()) {
        info!("Using data directory from {}: {}", DATA_DIR_ENV, dir);
        return Ok(PathBuf::from(dir.trim()));
    }

    let documents_dir =
        documents_dir.ok_or_else(|| anyhow::anyhow!("Could not determine documents directory"))?;
    let default_data_dir = documents_dir.join(DEFAULT_DIR_NAME);
    Ok(follow_redirect(default_data_dir))
}

fn follow_redirect(default_data_dir: PathBuf) -> PathBuf {
    let redirect_file = default_data_dir.join(REDIRECT_FILE_NAME);
    if !redirect_file.exists() {
        info!("Using default data directory: {}", default_data_dir.display());
        return default_data_dir;
    }

    match fs::read_to_string(&redirect_file) {
        Ok(redirected) => {
            let path = PathBuf::from(redirected.trim());
            if path.is_dir() {
                info!("Found redirect file, using data directory: {}", path.display());
                path
            } else {
                warn!(
                    "Redirect file points to non-existent directory: {}. Using default.",
                    redirected.trim()
                );
                default_data_dir
            }
        }
        Err(e) => {
            error!("Failed to read redirect file: {}. Using default directory.", e);
            default_data_dir
        }
    }
}
