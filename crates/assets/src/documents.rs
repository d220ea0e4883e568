//! On-disk JSON documents for materials, meshes and image import settings.

use std::collections::BTreeMap;
use std::path::PathBuf;

use baking::{ImageHandle, MaterialDraft, Tint};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `*.mat` file
///
/// Properties other than `shader`, `textures` and `colors` are carried
/// through untouched, so cloned materials keep them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialDocument {
    pub shader: String,
    #[serde(default)]
    pub textures: BTreeMap<String, Option<PathBuf>>,
    #[serde(default)]
    pub colors: BTreeMap<String, [f32; 4]>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MaterialDocument {
    pub fn new(shader: impl Into<String>) -> Self {
        Self {
            shader: shader.into(),
            ..Default::default()
        }
    }

    pub fn texture(&self, key: &str) -> Option<ImageHandle> {
        self.textures
            .get(key)
            .and_then(|path| path.as_ref())
            .map(ImageHandle::new)
    }

    pub fn tint(&self, key: &str) -> Option<Tint> {
        self.colors.get(key).copied().map(Tint::from)
    }
}

impl MaterialDraft for MaterialDocument {
    fn set_texture(&mut self, key: &str, image: &ImageHandle) {
        self.textures
            .insert(key.to_string(), Some(image.path().to_path_buf()));
    }

    fn set_tint(&mut self, key: &str, tint: Tint) {
        self.colors.insert(key.to_string(), tint.to_array());
    }
}

/// `*.mesh` file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshDocument {
    #[serde(default)]
    pub name: String,
    /// Material slots; `null` is an empty slot
    #[serde(default)]
    pub materials: Vec<Option<PathBuf>>,
    #[serde(default)]
    pub children: Vec<PathBuf>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_readable() -> bool {
    true
}

/// `<image>.import.json` sidecar. A missing sidecar means readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    #[serde(default = "default_readable")]
    pub readable: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            readable: true,
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_keeps_unknown_properties() {
        let json = r#"{
            "shader": "Toon",
            "textures": { "_MainTex": "Textures/body.png", "_BumpMap": null },
            "colors": { "_Color": [0.5, 0.5, 0.5, 1.0] },
            "renderQueue": 2450,
            "floats": { "_Cutoff": 0.3 }
        }"#;
        let doc: MaterialDocument = serde_json::from_str(json).unwrap();

        assert_eq!(doc.texture("_MainTex"), Some(ImageHandle::new("Textures/body.png")));
        assert_eq!(doc.texture("_BumpMap"), None);
        assert_eq!(doc.tint("_Color"), Some(Tint::new(0.5, 0.5, 0.5, 1.0)));

        let round: Value = serde_json::to_value(&doc).unwrap();
        assert_eq!(round["renderQueue"], 2450);
        assert_eq!(round["floats"]["_Cutoff"], 0.3);
    }

    #[test]
    fn test_draft_setters() {
        let mut doc = MaterialDocument::new("S");
        doc.set_texture("_MainTex", &ImageHandle::new("a.png"));
        doc.set_tint("_TintColor", Tint::WHITE);
        assert_eq!(doc.texture("_MainTex"), Some(ImageHandle::new("a.png")));
        assert_eq!(doc.colors["_TintColor"], [1.0; 4]);
    }

    #[test]
    fn test_mesh_defaults() {
        let doc: MeshDocument =
            serde_json::from_str(r#"{ "materials": ["a.mat", null] }"#).unwrap();
        assert_eq!(doc.materials, vec![Some(PathBuf::from("a.mat")), None]);
        assert!(doc.children.is_empty());
    }

    #[test]
    fn test_import_settings_default_readable() {
        let settings: ImportSettings = serde_json::from_str("{}").unwrap();
        assert!(settings.readable);
    }
}
