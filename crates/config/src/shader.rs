//! Shader config records: texture/color property pairs per shader.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A texture property and the color property that tints it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyPair {
    pub texture_key: String,
    pub color_key: String,
}

impl PropertyPair {
    pub fn new(texture_key: impl Into<String>, color_key: impl Into<String>) -> Self {
        Self {
            texture_key: texture_key.into(),
            color_key: color_key.into(),
        }
    }
}

/// One shader config asset
///
/// `shader` may be absent when the config was created without picking a
/// target shader; such records are ignored by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderConfigRecord {
    #[serde(default)]
    pub shader: Option<String>,
    /// Pairs in bake order
    #[serde(default)]
    pub textures: Vec<PropertyPair>,
}

impl ShaderConfigRecord {
    pub fn new(shader: impl Into<String>, textures: Vec<PropertyPair>) -> Self {
        Self {
            shader: Some(shader.into()),
            textures,
        }
    }

    /// Parse a record from its JSON form
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Target shader id, `None` when unset or blank
    pub fn shader_id(&self) -> Option<&str> {
        self.shader.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Enumerates the shader config records that populate a binding registry
pub trait ShaderConfigSource {
    fn records(&self) -> Result<Vec<ShaderConfigRecord>, ConfigError>;
}

impl ShaderConfigSource for [ShaderConfigRecord] {
    fn records(&self) -> Result<Vec<ShaderConfigRecord>, ConfigError> {
        Ok(self.to_vec())
    }
}

impl ShaderConfigSource for Vec<ShaderConfigRecord> {
    fn records(&self) -> Result<Vec<ShaderConfigRecord>, ConfigError> {
        Ok(self.clone())
    }
}
