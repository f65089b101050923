//! Configuration management for speech-history.
//!
//! Loads config from YAML files in standard locations. Saving goes through
//! the same validation as loading, so an out-of-range capacity never reaches
//! a running history.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ConfigError;
use crate::history::TrimPolicy;

pub const MIN_HISTORY_LENGTH: usize = 1;
pub const MAX_HISTORY_LENGTH: usize = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_history_length: usize,
    /// Unset means "derive from the legacy flags below".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitespace_strip: Option<TrimPolicy>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub trim_whitespace_from_start: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub trim_whitespace_from_end: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history_length: 500,
            whitespace_strip: None,
            trim_whitespace_from_start: false,
            trim_whitespace_from_end: false,
        }
    }
}

impl HistoryConfig {
    /// Effective trim policy for a plain copy.
    pub fn trim_policy(&self) -> TrimPolicy {
        self.whitespace_strip.unwrap_or_else(|| {
            TrimPolicy::from_flags(self.trim_whitespace_from_start, self.trim_whitespace_from_end)
        })
    }

    pub fn capacity(&self) -> Result<NonZeroUsize, ConfigError> {
        let value = self.max_history_length;
        NonZeroUsize::new(value)
            .filter(|_| value <= MAX_HISTORY_LENGTH)
            .ok_or(ConfigError::InvalidCapacity {
                value,
                min: MIN_HISTORY_LENGTH,
                max: MAX_HISTORY_LENGTH,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub sounds: bool,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self { sounds: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub history: HistoryConfig,
    pub feedback: FeedbackConfig,
}

impl Config {
    /// Load configuration from YAML file.
    ///
    /// Searches standard locations if no path is provided:
    /// 1. ./speech-history.yaml
    /// 2. ~/.config/speech-history/config.yaml
    /// 3. /etc/speech-history/config.yaml
    ///
    /// A file that cannot be read, parsed or validated falls back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = path.map(PathBuf::from).or_else(|| {
            let candidates = [
                std::env::current_dir().ok().map(|d| d.join("speech-history.yaml")),
                Self::user_path(),
                Some(PathBuf::from("/etc/speech-history/config.yaml")),
            ];
            candidates.into_iter().flatten().find(|p| p.exists())
        });

        let Some(config_path) = resolved else {
            info!("No config file found, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match serde_yml::from_str::<Self>(&contents) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        info!("Loaded config from {}", config_path.display());
                        config
                    }
                    Err(e) => {
                        tracing::warn!("Invalid config in {}: {e}, using defaults", config_path.display());
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {e}, using defaults", config_path.display());
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}, using defaults", config_path.display());
                Self::default()
            }
        }
    }

    /// Per-user config location, also the default save target.
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("speech-history/config.yaml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.history.capacity().map(|_| ())
    }

    /// Validate and write the config as YAML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let yaml = serde_yml::to_string(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, yaml).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Saved config to {}", path.display());
        Ok(())
    }
}
