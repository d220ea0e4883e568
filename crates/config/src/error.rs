//! Error types for configuration loading.

use std::path::PathBuf;

/// Errors that can occur while enumerating shader config records.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid shader config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to scan config directory: {0}")]
    Walk(#[from] walkdir::Error),
}
