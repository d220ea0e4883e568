//! Shader config records discovered on disk.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{ConfigError, ShaderConfigRecord, ShaderConfigSource};

/// File name suffix identifying a shader config asset
pub const CONFIG_FILE_SUFFIX: &str = ".bakerconfig.json";

/// Reads every `*.bakerconfig.json` below a directory
///
/// Files are visited in sorted path order so that repeated scans of the same
/// tree produce the same record order.
#[derive(Debug, Clone)]
pub struct DirectoryConfigSource {
    root: PathBuf,
}

impl DirectoryConfigSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_record(path: &Path) -> Result<ShaderConfigRecord, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ShaderConfigRecord::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ShaderConfigSource for DirectoryConfigSource {
    fn records(&self) -> Result<Vec<ShaderConfigRecord>, ConfigError> {
        let mut records = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let is_config = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(CONFIG_FILE_SUFFIX));
            if !is_config {
                continue;
            }
            debug!("Reading shader config {}", entry.path().display());
            records.push(Self::read_record(entry.path())?);
        }
        info!(
            "Found {} shader config file(s) under {}",
            records.len(),
            self.root.display()
        );
        Ok(records)
    }
}
