//! Shared configuration for tintbake
//!
//! This crate provides the configuration consumed by the baker:
//! - [`ShaderConfigRecord`] - which texture/color property pairs of a shader bake together
//! - [`ShaderConfigSource`] - anything that can enumerate those records
//! - [`DirectoryConfigSource`] - records discovered as `*.bakerconfig.json` files
//! - [`BakerSettings`] - naming of generated assets

mod error;
mod shader;
mod source;

pub use error::ConfigError;
pub use shader::{PropertyPair, ShaderConfigRecord, ShaderConfigSource};
pub use source::{CONFIG_FILE_SUFFIX, DirectoryConfigSource};

use serde::{Deserialize, Serialize};

/// Default suffix appended to a baked texture's base name
pub const DEFAULT_TEXTURE_SUFFIX: &str = "_baked";

/// Default suffix appended to a baked material's base name
pub const DEFAULT_MATERIAL_SUFFIX: &str = "_baked";

/// Environment variable overriding [`BakerSettings::texture_suffix`]
pub const TEXTURE_SUFFIX_ENV: &str = "TINTBAKE_TEXTURE_SUFFIX";

/// Environment variable overriding [`BakerSettings::material_suffix`]
pub const MATERIAL_SUFFIX_ENV: &str = "TINTBAKE_MATERIAL_SUFFIX";

/// Naming settings for assets produced by a bake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakerSettings {
    /// Appended after `{source stem}{texture key}` when naming a baked image
    pub texture_suffix: String,
    /// Appended after the source material's stem when naming the baked material
    pub material_suffix: String,
}

impl Default for BakerSettings {
    fn default() -> Self {
        Self {
            texture_suffix: DEFAULT_TEXTURE_SUFFIX.to_string(),
            material_suffix: DEFAULT_MATERIAL_SUFFIX.to_string(),
        }
    }
}

impl BakerSettings {
    /// Defaults, overridden by `TINTBAKE_TEXTURE_SUFFIX` / `TINTBAKE_MATERIAL_SUFFIX`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, overridden by whatever `lookup` returns for the env variable names
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(suffix) = lookup(TEXTURE_SUFFIX_ENV) {
            settings.texture_suffix = suffix;
        }
        if let Some(suffix) = lookup(MATERIAL_SUFFIX_ENV) {
            settings.material_suffix = suffix;
        }
        settings
    }
}
