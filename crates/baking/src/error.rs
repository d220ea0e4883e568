use std::path::PathBuf;

use thiserror::Error;
use tintbake_config::ConfigError;

use crate::types::MaterialId;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Pixel buffer holds {actual} values, expected {expected} for {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Cannot encode an empty {width}x{height} image")]
    Empty { width: u32, height: u32 },
    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),
}

/// Read, write or reimport failure reported by the host asset store
#[derive(Debug, Error)]
pub enum AssetIoError {
    #[error("Asset not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid asset {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },
    #[error("Image error on {}: {source}", path.display())]
    Raster {
        path: PathBuf,
        #[source]
        source: RasterError,
    },
}

/// Per-material bake failure. Never fatal to a batch.
#[derive(Debug, Error)]
pub enum BakeError {
    #[error("No shader settings found for shader '{shader_id}' (material {material})")]
    ConfigurationMissing {
        material: MaterialId,
        shader_id: String,
    },
    #[error("Asset I/O failed while baking {material}: {source}")]
    AssetIo {
        material: MaterialId,
        #[source]
        source: AssetIoError,
    },
    #[error("Bake of {0} was aborted by an earlier error")]
    Aborted(MaterialId),
}

impl BakeError {
    pub(crate) fn asset_io(material: &MaterialId, source: AssetIoError) -> Self {
        Self::AssetIo {
            material: material.clone(),
            source,
        }
    }

    /// The material whose bake failed
    pub fn material(&self) -> &MaterialId {
        match self {
            Self::ConfigurationMissing { material, .. } => material,
            Self::AssetIo { material, .. } => material,
            Self::Aborted(material) => material,
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to enumerate shader configs: {0}")]
    Source(#[from] ConfigError),
}
