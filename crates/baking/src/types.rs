use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A color that scales texture channels during a bake
///
/// Only `r`, `g` and `b` take part in the multiply; `a` is carried along
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Tint {
    /// Full-intensity white, the tint with no visible effect
    pub const WHITE: Tint = Tint::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// True when R, G and B are exactly 1.0
    ///
    /// Alpha is not inspected: (1, 1, 1, 0) is neutral as well.
    pub fn is_neutral(&self) -> bool {
        self.r == 1.0 && self.g == 1.0 && self.b == 1.0
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 4]> for Tint {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Material asset, addressed by its path relative to the host's asset root
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(PathBuf);

impl MaterialId {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Display name (file stem)
    pub fn name(&self) -> String {
        file_stem(&self.0)
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Mesh renderer asset owning an ordered set of material slots
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(PathBuf);

impl MeshId {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn name(&self) -> String {
        file_stem(&self.0)
    }
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Image asset bound to a material texture slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageHandle(PathBuf);

impl ImageHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File name including extension, for progress labels
    pub fn file_name(&self) -> String {
        self.0
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// A unit of user selection queued for baking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkItem {
    Material(MaterialId),
    Mesh(MeshId),
}

impl WorkItem {
    /// List label, e.g. `[MAT] Brick` or `[MESH] Wall`
    pub fn label(&self) -> String {
        match self {
            WorkItem::Material(material) => format!("[MAT] {}", material.name()),
            WorkItem::Mesh(mesh) => format!("[MESH] {}", mesh.name()),
        }
    }
}

/// One texture/color pair that was folded into a new image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BakedPairRecord {
    /// The newly written image
    pub image: ImageHandle,
    pub texture_key: String,
    pub color_key: String,
}

/// Outcome of baking one material
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BakeResult {
    /// The material that was baked
    pub material: MaterialId,
    /// Pairs baked, in binding order
    pub baked_pairs: Vec<BakedPairRecord>,
    /// The derived material; `None` when there was nothing to bake
    pub baked_material: Option<MaterialId>,
}

impl BakeResult {
    /// True when at least one pair was baked
    pub fn any_baked(&self) -> bool {
        !self.baked_pairs.is_empty()
    }

    pub fn is_nothing_to_bake(&self) -> bool {
        self.baked_material.is_none()
    }
}
