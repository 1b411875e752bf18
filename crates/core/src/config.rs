use crate::error::{FavorError, FavorResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Plugin configuration, fixed once the store is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavorConfig {
    #[serde(default = "default_max_value")]
    pub max_value: i64,

    #[serde(default = "default_min_value")]
    pub min_value: i64,

    #[serde(default = "default_init_value")]
    pub init_value: i64,

    /// Largest step a single adjustment may take in either direction
    #[serde(default = "default_max_change")]
    pub max_change: i64,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory under the host data directory
    #[serde(default = "default_storage_dir")]
    pub dir: String,

    #[serde(default = "default_storage_file")]
    pub file: String,

    /// Serialize read-modify-write cycles on the data file.
    /// Off by default: overlapping writers race and the last one wins.
    #[serde(default)]
    pub exclusive_writes: bool,
}

fn default_max_value() -> i64 {
    100
}

fn default_min_value() -> i64 {
    0
}

fn default_init_value() -> i64 {
    50
}

fn default_max_change() -> i64 {
    10
}

fn default_storage_dir() -> String {
    "favorability".to_string()
}

fn default_storage_file() -> String {
    "data.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            file: default_storage_file(),
            exclusive_writes: false,
        }
    }
}

impl Default for FavorConfig {
    fn default() -> Self {
        Self {
            max_value: default_max_value(),
            min_value: default_min_value(),
            init_value: default_init_value(),
            max_change: default_max_change(),
            storage: StorageConfig::default(),
        }
    }
}

impl FavorConfig {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist.
    pub fn load(config_path: &Path) -> FavorResult<Self> {
        let config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .map_err(|e| FavorError::io(config_path, e))?;
            toml::from_str(&content).map_err(|e| {
                FavorError::Config(format!(
                    "failed to parse {}: {}",
                    config_path.display(),
                    e
                ))
            })?
        } else {
            tracing::info!(
                path = %config_path.display(),
                "Configuration file not found, using defaults"
            );
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FavorResult<()> {
        if self.min_value > self.max_value {
            return Err(FavorError::Config(format!(
                "min_value ({}) is greater than max_value ({})",
                self.min_value, self.max_value
            )));
        }
        if self.init_value < self.min_value || self.init_value > self.max_value {
            return Err(FavorError::Config(format!(
                "init_value ({}) is outside [{}, {}]",
                self.init_value, self.min_value, self.max_value
            )));
        }
        if self.max_change < 0 {
            return Err(FavorError::Config(format!(
                "max_change ({}) must not be negative",
                self.max_change
            )));
        }
        Ok(())
    }

    /// Path of the data file relative to the host-provided data directory
    pub fn data_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.storage.dir).join(&self.storage.file)
    }
}
