//! Collaborator traits implemented by the host asset store.
//!
//! The core never touches files directly. Everything it reads or writes goes
//! through these traits, so an editor integration, a filesystem tree or an
//! in-memory test double can all drive the same bake.

use std::path::{Path, PathBuf};

use crate::error::AssetIoError;
use crate::raster::RasterImage;
use crate::types::{ImageHandle, MaterialId, MeshId, Tint};

/// Reads source images
pub trait ImageLoader {
    /// Whether the image's pixels can be read right now
    fn is_readable(&self, image: &ImageHandle) -> Result<bool, AssetIoError>;

    /// Make the image readable, reimporting it if the host needs to
    fn ensure_readable(&mut self, image: &ImageHandle) -> Result<(), AssetIoError>;

    /// Decode the image's pixels
    fn load(&self, image: &ImageHandle) -> Result<RasterImage, AssetIoError>;
}

/// Persists baked images
pub trait ImageWriter {
    /// Write `bytes` as `{directory}/{base_name}{suffix}.{ext}`, choosing a
    /// variant of the name that collides with no existing asset
    fn write_unique(
        &mut self,
        directory: &Path,
        base_name: &str,
        suffix: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, AssetIoError>;

    /// Register a freshly written file as an image asset with readable pixels
    fn import_and_make_readable(&mut self, path: &Path) -> Result<ImageHandle, AssetIoError>;
}

/// An unsaved copy of a material
pub trait MaterialDraft {
    fn set_texture(&mut self, key: &str, image: &ImageHandle);
    fn set_tint(&mut self, key: &str, tint: Tint);
}

/// Reads materials and saves derived copies
pub trait MaterialStore {
    type Draft: MaterialDraft;

    fn shader_id(&self, material: &MaterialId) -> Result<String, AssetIoError>;

    /// Image bound at a texture property, `None` when the slot is empty
    fn texture(&self, material: &MaterialId, key: &str)
    -> Result<Option<ImageHandle>, AssetIoError>;

    /// Color at a color property, `None` when the material lacks it
    fn tint(&self, material: &MaterialId, key: &str) -> Result<Option<Tint>, AssetIoError>;

    fn clone_material(&self, material: &MaterialId) -> Result<Self::Draft, AssetIoError>;

    /// Save `draft` as `{directory}/{base_name}{suffix}.{ext}` under a
    /// collision-free name
    fn create_unique_asset(
        &mut self,
        draft: Self::Draft,
        directory: &Path,
        base_name: &str,
        suffix: &str,
    ) -> Result<MaterialId, AssetIoError>;
}

/// Reads and rewrites mesh material slots
pub trait MeshStore {
    /// Slot materials in slot order; `None` is an empty slot
    fn material_slots(&self, mesh: &MeshId) -> Result<Vec<Option<MaterialId>>, AssetIoError>;

    /// Replace the entire slot set at once
    ///
    /// Implementations must not leave a partially rewritten slot set behind.
    fn replace_material_slots(
        &mut self,
        mesh: &MeshId,
        slots: Vec<Option<MaterialId>>,
    ) -> Result<(), AssetIoError>;
}

/// Parent/child relation between meshes, for recursive selection
pub trait SceneHierarchy {
    fn children(&self, mesh: &MeshId) -> Result<Vec<MeshId>, AssetIoError>;
}

/// Everything a single material bake needs
pub trait BakeHost: ImageLoader + ImageWriter + MaterialStore {}

impl<T: ImageLoader + ImageWriter + MaterialStore> BakeHost for T {}
