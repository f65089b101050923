//! Error types for history navigation, configuration and hook installation.

use std::path::PathBuf;

/// Errors from reading the history store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("speech history is empty")]
    Empty,
}

/// Errors from loading, validating or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("max history length must be between {min} and {max}, got {value}")]
    InvalidCapacity { value: usize, min: usize, max: usize },
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_yml::Error),
}

/// Errors from wrapping the host speak entry point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TapError {
    #[error("speech tap is already installed")]
    AlreadyInstalled,
}
