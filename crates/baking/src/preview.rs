//! Read-only views of what a bake would do
//!
//! Used by front ends to show a material's shader, its bound pairs and the
//! current texture and tint behind each pair before anything is written.

use std::fmt;

use tintbake_config::PropertyPair;

use crate::error::AssetIoError;
use crate::host::{MaterialStore, MeshStore};
use crate::registry::ShaderBindingRegistry;
use crate::types::{ImageHandle, MaterialId, MeshId, Tint, WorkItem};

/// One bound pair as it currently stands on a material
#[derive(Debug, Clone, PartialEq)]
pub struct PairPreview {
    /// 1-based position in the binding
    pub index: usize,
    pub pair: PropertyPair,
    pub texture: Option<ImageHandle>,
    pub tint: Option<Tint>,
}

impl PairPreview {
    /// Whether the engine would composite this pair
    pub fn will_bake(&self) -> bool {
        self.texture.is_some() && self.tint.is_some_and(|t| !t.is_neutral())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialPreview {
    pub material: MaterialId,
    pub shader_id: String,
    /// `None` when the shader has no binding
    pub pairs: Option<Vec<PairPreview>>,
}

impl MaterialPreview {
    pub fn has_binding(&self) -> bool {
        self.pairs.is_some()
    }

    /// Pairs that would be composited
    pub fn bakeable(&self) -> impl Iterator<Item = &PairPreview> {
        self.pairs.iter().flatten().filter(|p| p.will_bake())
    }
}

impl fmt::Display for MaterialPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (shader: {})", self.material, self.shader_id)?;
        let Some(pairs) = &self.pairs else {
            return writeln!(f, "  No shader settings.");
        };
        if pairs.is_empty() {
            return writeln!(f, "  No bound properties.");
        }
        for p in pairs {
            let texture = p
                .texture
                .as_ref()
                .map_or_else(|| "(none)".to_string(), ImageHandle::file_name);
            let tint = p.tint.map_or_else(
                || "(missing)".to_string(),
                |t| format!("({:.3}, {:.3}, {:.3}, {:.3})", t.r, t.g, t.b, t.a),
            );
            let mark = if p.will_bake() { "*" } else { " " };
            writeln!(
                f,
                "{mark} #{} {} = {}  x  {} = {}",
                p.index, p.pair.texture_key, texture, p.pair.color_key, tint
            )?;
        }
        Ok(())
    }
}

/// Describe a material against the current registry
pub fn describe_material<S: MaterialStore + ?Sized>(
    registry: &ShaderBindingRegistry,
    store: &S,
    material: &MaterialId,
) -> Result<MaterialPreview, AssetIoError> {
    let shader_id = store.shader_id(material)?;
    let pairs = match registry.resolve(&shader_id) {
        Some(binding) => {
            let mut pairs = Vec::with_capacity(binding.pairs().len());
            for (i, pair) in binding.pairs().iter().enumerate() {
                pairs.push(PairPreview {
                    index: i + 1,
                    pair: pair.clone(),
                    texture: store.texture(material, &pair.texture_key)?,
                    tint: store.tint(material, &pair.color_key)?,
                });
            }
            Some(pairs)
        }
        None => None,
    };
    Ok(MaterialPreview {
        material: material.clone(),
        shader_id,
        pairs,
    })
}

/// A mesh slot and the material in it, if any
#[derive(Debug, Clone, PartialEq)]
pub struct SlotPreview {
    /// 1-based slot number
    pub slot: usize,
    pub material: Option<MaterialPreview>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemPreview {
    Material(MaterialPreview),
    Mesh { mesh: MeshId, slots: Vec<SlotPreview> },
}

impl fmt::Display for ItemPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Material(material) => write!(f, "{material}"),
            Self::Mesh { mesh, slots } => {
                writeln!(f, "{mesh}")?;
                for slot in slots {
                    write!(f, "Material #{}: ", slot.slot)?;
                    match &slot.material {
                        Some(material) => write!(f, "{material}")?,
                        None => writeln!(f, "(empty)")?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// Describe a work item; meshes list every slot in order
pub fn describe_item<H: MaterialStore + MeshStore + ?Sized>(
    registry: &ShaderBindingRegistry,
    host: &H,
    item: &WorkItem,
) -> Result<ItemPreview, AssetIoError> {
    match item {
        WorkItem::Material(material) => {
            describe_material(registry, host, material).map(ItemPreview::Material)
        }
        WorkItem::Mesh(mesh) => {
            let mut slots = Vec::new();
            for (i, material) in host.material_slots(mesh)?.iter().enumerate() {
                let material = match material {
                    Some(m) => Some(describe_material(registry, host, m)?),
                    None => None,
                };
                slots.push(SlotPreview {
                    slot: i + 1,
                    material,
                });
            }
            Ok(ItemPreview::Mesh {
                mesh: mesh.clone(),
                slots,
            })
        }
    }
}
