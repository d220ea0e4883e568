//! In-memory host used by the unit tests

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tintbake_config::{PropertyPair, ShaderConfigRecord};

use crate::error::AssetIoError;
use crate::host::{
    ImageLoader, ImageWriter, MaterialDraft, MaterialStore, MeshStore, SceneHierarchy,
};
use crate::raster::RasterImage;
use crate::registry::ShaderBindingRegistry;
use crate::types::{ImageHandle, MaterialId, MeshId, Tint};

#[derive(Debug, Clone, Default)]
pub struct MemoryMaterial {
    pub shader: String,
    pub textures: HashMap<String, ImageHandle>,
    pub tints: HashMap<String, Tint>,
}

impl MemoryMaterial {
    pub fn new(shader: &str) -> Self {
        Self {
            shader: shader.to_string(),
            ..Default::default()
        }
    }

    pub fn with_texture(mut self, key: &str, image: &str) -> Self {
        self.textures.insert(key.to_string(), ImageHandle::new(image));
        self
    }

    pub fn with_tint(mut self, key: &str, tint: Tint) -> Self {
        self.tints.insert(key.to_string(), tint);
        self
    }
}

impl MaterialDraft for MemoryMaterial {
    fn set_texture(&mut self, key: &str, image: &ImageHandle) {
        self.textures.insert(key.to_string(), image.clone());
    }

    fn set_tint(&mut self, key: &str, tint: Tint) {
        self.tints.insert(key.to_string(), tint);
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryMesh {
    pub slots: Vec<Option<MaterialId>>,
    pub children: Vec<MeshId>,
}

#[derive(Debug, Default)]
pub struct MemoryHost {
    pub images: HashMap<PathBuf, RasterImage>,
    pub written: HashMap<PathBuf, Vec<u8>>,
    pub unreadable: HashSet<PathBuf>,
    pub broken: HashSet<PathBuf>,
    pub materials: HashMap<MaterialId, MemoryMaterial>,
    pub meshes: HashMap<MeshId, MemoryMesh>,
    pub reimports: Vec<PathBuf>,
    pub saved_materials: Vec<MaterialId>,
    pub slot_writes: usize,
    pub fail_slot_writes: bool,
}

impl MemoryHost {
    pub fn add_image(&mut self, path: &str, image: RasterImage) {
        self.images.insert(PathBuf::from(path), image);
    }

    pub fn add_material(&mut self, path: &str, material: MemoryMaterial) -> MaterialId {
        let id = MaterialId::new(path);
        self.materials.insert(id.clone(), material);
        id
    }

    pub fn add_mesh(&mut self, path: &str, slots: Vec<Option<MaterialId>>) -> MeshId {
        let id = MeshId::new(path);
        self.meshes.insert(
            id.clone(),
            MemoryMesh {
                slots,
                children: Vec::new(),
            },
        );
        id
    }

    pub fn material(&self, id: &MaterialId) -> &MemoryMaterial {
        &self.materials[id]
    }

    fn exists(&self, path: &Path) -> bool {
        self.images.contains_key(path)
            || self.written.contains_key(path)
            || self.materials.contains_key(&MaterialId::new(path))
    }

    fn unique_path(&self, directory: &Path, base: &str, extension: &str) -> PathBuf {
        let mut candidate = directory.join(format!("{base}.{extension}"));
        let mut counter = 1;
        while self.exists(&candidate) {
            candidate = directory.join(format!("{base} {counter}.{extension}"));
            counter += 1;
        }
        candidate
    }
}

impl ImageLoader for MemoryHost {
    fn is_readable(&self, image: &ImageHandle) -> Result<bool, AssetIoError> {
        Ok(!self.unreadable.contains(image.path()))
    }

    fn ensure_readable(&mut self, image: &ImageHandle) -> Result<(), AssetIoError> {
        self.unreadable.remove(image.path());
        self.reimports.push(image.path().to_path_buf());
        Ok(())
    }

    fn load(&self, image: &ImageHandle) -> Result<RasterImage, AssetIoError> {
        if self.broken.contains(image.path()) {
            return Err(AssetIoError::Invalid {
                path: image.path().to_path_buf(),
                message: "corrupt image".to_string(),
            });
        }
        if self.unreadable.contains(image.path()) {
            return Err(AssetIoError::Invalid {
                path: image.path().to_path_buf(),
                message: "not readable".to_string(),
            });
        }
        self.images
            .get(image.path())
            .cloned()
            .ok_or_else(|| AssetIoError::NotFound(image.path().to_path_buf()))
    }
}

impl ImageWriter for MemoryHost {
    fn write_unique(
        &mut self,
        directory: &Path,
        base_name: &str,
        suffix: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, AssetIoError> {
        let path = self.unique_path(directory, &format!("{base_name}{suffix}"), "png");
        self.written.insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    fn import_and_make_readable(&mut self, path: &Path) -> Result<ImageHandle, AssetIoError> {
        let bytes = self
            .written
            .get(path)
            .ok_or_else(|| AssetIoError::NotFound(path.to_path_buf()))?;
        let image = RasterImage::decode(bytes).map_err(|source| AssetIoError::Raster {
            path: path.to_path_buf(),
            source,
        })?;
        self.images.insert(path.to_path_buf(), image);
        Ok(ImageHandle::new(path))
    }
}

impl MaterialStore for MemoryHost {
    type Draft = MemoryMaterial;

    fn shader_id(&self, material: &MaterialId) -> Result<String, AssetIoError> {
        self.materials
            .get(material)
            .map(|m| m.shader.clone())
            .ok_or_else(|| AssetIoError::NotFound(material.path().to_path_buf()))
    }

    fn texture(
        &self,
        material: &MaterialId,
        key: &str,
    ) -> Result<Option<ImageHandle>, AssetIoError> {
        Ok(self.material(material).textures.get(key).cloned())
    }

    fn tint(&self, material: &MaterialId, key: &str) -> Result<Option<Tint>, AssetIoError> {
        Ok(self.material(material).tints.get(key).copied())
    }

    fn clone_material(&self, material: &MaterialId) -> Result<MemoryMaterial, AssetIoError> {
        Ok(self.material(material).clone())
    }

    fn create_unique_asset(
        &mut self,
        draft: MemoryMaterial,
        directory: &Path,
        base_name: &str,
        suffix: &str,
    ) -> Result<MaterialId, AssetIoError> {
        let path = self.unique_path(directory, &format!("{base_name}{suffix}"), "mat");
        let id = MaterialId::new(path);
        self.saved_materials.push(id.clone());
        self.materials.insert(id.clone(), draft);
        Ok(id)
    }
}

impl MeshStore for MemoryHost {
    fn material_slots(&self, mesh: &MeshId) -> Result<Vec<Option<MaterialId>>, AssetIoError> {
        self.meshes
            .get(mesh)
            .map(|m| m.slots.clone())
            .ok_or_else(|| AssetIoError::NotFound(mesh.path().to_path_buf()))
    }

    fn replace_material_slots(
        &mut self,
        mesh: &MeshId,
        slots: Vec<Option<MaterialId>>,
    ) -> Result<(), AssetIoError> {
        if self.fail_slot_writes {
            return Err(AssetIoError::Invalid {
                path: mesh.path().to_path_buf(),
                message: "read-only".to_string(),
            });
        }
        let entry = self
            .meshes
            .get_mut(mesh)
            .ok_or_else(|| AssetIoError::NotFound(mesh.path().to_path_buf()))?;
        entry.slots = slots;
        self.slot_writes += 1;
        Ok(())
    }
}

impl SceneHierarchy for MemoryHost {
    fn children(&self, mesh: &MeshId) -> Result<Vec<MeshId>, AssetIoError> {
        self.meshes
            .get(mesh)
            .map(|m| m.children.clone())
            .ok_or_else(|| AssetIoError::NotFound(mesh.path().to_path_buf()))
    }
}

/// Registry with shader "S" bound to `_MainTex` x `_TintColor`
pub fn tint_registry() -> ShaderBindingRegistry {
    ShaderBindingRegistry::from_records(vec![ShaderConfigRecord::new(
        "S",
        vec![PropertyPair::new("_MainTex", "_TintColor")],
    )])
}

/// Solid-color image
pub fn solid(width: u32, height: u32, color: [f32; 4]) -> RasterImage {
    let mut image = RasterImage::new(width, height);
    image.fill(color);
    image
}

/// Host holding `Textures/red.png` (2x2 opaque red) and material
/// `Materials/M.mat` on shader "S" with the given tint
pub fn red_material_host(tint: Tint) -> (MemoryHost, MaterialId) {
    let mut host = MemoryHost::default();
    host.add_image("Textures/red.png", solid(2, 2, [1.0, 0.0, 0.0, 1.0]));
    let material = host.add_material(
        "Materials/M.mat",
        MemoryMaterial::new("S")
            .with_texture("_MainTex", "Textures/red.png")
            .with_tint("_TintColor", tint),
    );
    (host, material)
}
