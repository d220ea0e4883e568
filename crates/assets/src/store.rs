//! Asset store rooted at a directory on disk
//!
//! Every handle the baker sees is a path relative to the store root. JSON
//! documents are rewritten through a temp file and a rename so a crash never
//! leaves a half-written mesh or import sidecar behind.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use baking::{
    AssetIoError, BAKED_IMAGE_EXTENSION, ImageHandle, ImageLoader, ImageWriter, MaterialId,
    MaterialStore, MeshId, MeshStore, RasterImage, SceneHierarchy, Tint,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::documents::{ImportSettings, MaterialDocument, MeshDocument};

pub const MATERIAL_EXTENSION: &str = "mat";
pub const MESH_EXTENSION: &str = "mesh";
pub const IMPORT_SETTINGS_SUFFIX: &str = ".import.json";

/// Sidecar path holding an image's import settings
pub fn import_settings_path(image: &Path) -> PathBuf {
    let mut name = OsString::from(image.as_os_str());
    name.push(IMPORT_SETTINGS_SUFFIX);
    PathBuf::from(name)
}

fn io_error(path: &Path, source: io::Error) -> AssetIoError {
    if source.kind() == io::ErrorKind::NotFound {
        AssetIoError::NotFound(path.to_path_buf())
    } else {
        AssetIoError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Canonical form of `path`, resolving the longest existing ancestor so
/// paths to files that do not exist yet still compare against the root
fn canonical(path: &Path) -> PathBuf {
    let mut existing = path;
    let mut rest = Vec::new();
    loop {
        if let Ok(base) = fs::canonicalize(existing) {
            return rest.iter().rev().fold(base, |full, name| full.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name);
                existing = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// Write a freshly created file, removing it again if the write fails
fn write_or_remove(mut file: impl Write, full: &Path, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes)
        .and_then(|()| file.flush())
        .inspect_err(|_| {
            let _ = fs::remove_file(full);
        })
}

fn invalid(path: &Path, message: impl ToString) -> AssetIoError {
    AssetIoError::Invalid {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    /// Create a store rooted at `root`. The directory is only touched when
    /// assets are read or written.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full filesystem path of an asset path
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Asset path of a filesystem path, if it lies under the root.
    /// Relative paths are taken as asset paths already.
    pub fn relative(&self, path: &Path) -> Option<PathBuf> {
        if path.is_relative() {
            return Some(path.to_path_buf());
        }
        if let Ok(rest) = path.strip_prefix(&self.root) {
            return Some(rest.to_path_buf());
        }
        canonical(path)
            .strip_prefix(canonical(&self.root))
            .ok()
            .map(Path::to_path_buf)
    }

    pub fn read_material(&self, material: &MaterialId) -> Result<MaterialDocument, AssetIoError> {
        self.read_json(material.path())
    }

    pub fn read_mesh(&self, mesh: &MeshId) -> Result<MeshDocument, AssetIoError> {
        self.read_json(mesh.path())
    }

    pub fn import_settings(&self, image: &ImageHandle) -> Result<ImportSettings, AssetIoError> {
        match self.read_json(&import_settings_path(image.path())) {
            Err(AssetIoError::NotFound(_)) => Ok(ImportSettings::default()),
            other => other,
        }
    }

    pub fn set_import_settings(
        &self,
        image: &ImageHandle,
        settings: &ImportSettings,
    ) -> Result<(), AssetIoError> {
        self.replace_json(&import_settings_path(image.path()), settings)
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, AssetIoError> {
        let bytes = fs::read(self.resolve(path)).map_err(|e| io_error(path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| invalid(path, e))
    }

    /// Overwrite a JSON document through a temp file and rename
    fn replace_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), AssetIoError> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| invalid(path, e))?;
        let full = self.resolve(path);
        let mut temp = OsString::from(full.as_os_str());
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        fs::write(&temp, &bytes).map_err(|e| io_error(path, e))?;
        fs::rename(&temp, &full).map_err(|e| {
            let _ = fs::remove_file(&temp);
            io_error(path, e)
        })
    }

    /// Write `bytes` to `directory/base.ext`, or `base 1.ext`, `base 2.ext`
    /// and so on if taken. Existing files are never overwritten.
    fn create_unique(
        &self,
        directory: &Path,
        base: &str,
        extension: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, AssetIoError> {
        fs::create_dir_all(self.resolve(directory)).map_err(|e| io_error(directory, e))?;

        let mut counter = 0u32;
        loop {
            let name = match counter {
                0 => format!("{base}.{extension}"),
                n => format!("{base} {n}.{extension}"),
            };
            let path = directory.join(name);
            let full = self.resolve(&path);
            match OpenOptions::new().write(true).create_new(true).open(&full) {
                Ok(file) => {
                    write_or_remove(file, &full, bytes).map_err(|e| io_error(&path, e))?;
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => counter += 1,
                Err(e) => return Err(io_error(&path, e)),
            }
        }
    }
}

impl ImageLoader for FsAssetStore {
    fn is_readable(&self, image: &ImageHandle) -> Result<bool, AssetIoError> {
        Ok(self.import_settings(image)?.readable)
    }

    fn ensure_readable(&mut self, image: &ImageHandle) -> Result<(), AssetIoError> {
        let mut settings = self.import_settings(image)?;
        if !settings.readable {
            settings.readable = true;
            self.set_import_settings(image, &settings)?;
            info!("Marked {} readable", image);
        }
        Ok(())
    }

    fn load(&self, image: &ImageHandle) -> Result<RasterImage, AssetIoError> {
        if !self.is_readable(image)? {
            return Err(invalid(image.path(), "image is not marked readable"));
        }
        let bytes = fs::read(self.resolve(image.path())).map_err(|e| io_error(image.path(), e))?;
        RasterImage::decode(&bytes).map_err(|source| AssetIoError::Raster {
            path: image.path().to_path_buf(),
            source,
        })
    }
}

impl ImageWriter for FsAssetStore {
    fn write_unique(
        &mut self,
        directory: &Path,
        base_name: &str,
        suffix: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, AssetIoError> {
        let path = self.create_unique(
            directory,
            &format!("{base_name}{suffix}"),
            BAKED_IMAGE_EXTENSION,
            bytes,
        )?;
        debug!("Wrote image {}", path.display());
        Ok(path)
    }

    fn import_and_make_readable(&mut self, path: &Path) -> Result<ImageHandle, AssetIoError> {
        if !self.resolve(path).is_file() {
            return Err(AssetIoError::NotFound(path.to_path_buf()));
        }
        let image = ImageHandle::new(path);
        let mut settings = self.import_settings(&image)?;
        settings.readable = true;
        self.set_import_settings(&image, &settings)?;
        Ok(image)
    }
}

impl MaterialStore for FsAssetStore {
    type Draft = MaterialDocument;

    fn shader_id(&self, material: &MaterialId) -> Result<String, AssetIoError> {
        Ok(self.read_material(material)?.shader)
    }

    fn texture(
        &self,
        material: &MaterialId,
        key: &str,
    ) -> Result<Option<ImageHandle>, AssetIoError> {
        Ok(self.read_material(material)?.texture(key))
    }

    fn tint(&self, material: &MaterialId, key: &str) -> Result<Option<Tint>, AssetIoError> {
        Ok(self.read_material(material)?.tint(key))
    }

    fn clone_material(&self, material: &MaterialId) -> Result<MaterialDocument, AssetIoError> {
        self.read_material(material)
    }

    fn create_unique_asset(
        &mut self,
        draft: MaterialDocument,
        directory: &Path,
        base_name: &str,
        suffix: &str,
    ) -> Result<MaterialId, AssetIoError> {
        let base = format!("{base_name}{suffix}");
        let bytes =
            serde_json::to_vec_pretty(&draft).map_err(|e| invalid(&directory.join(&base), e))?;
        let path = self.create_unique(directory, &base, MATERIAL_EXTENSION, &bytes)?;
        debug!("Created material {}", path.display());
        Ok(MaterialId::new(path))
    }
}

impl MeshStore for FsAssetStore {
    fn material_slots(&self, mesh: &MeshId) -> Result<Vec<Option<MaterialId>>, AssetIoError> {
        let doc = self.read_mesh(mesh)?;
        Ok(doc
            .materials
            .into_iter()
            .map(|slot| slot.map(MaterialId::new))
            .collect())
    }

    fn replace_material_slots(
        &mut self,
        mesh: &MeshId,
        slots: Vec<Option<MaterialId>>,
    ) -> Result<(), AssetIoError> {
        let mut doc = self.read_mesh(mesh)?;
        doc.materials = slots
            .into_iter()
            .map(|slot| slot.map(|m| m.path().to_path_buf()))
            .collect();
        self.replace_json(mesh.path(), &doc)
    }
}

impl SceneHierarchy for FsAssetStore {
    fn children(&self, mesh: &MeshId) -> Result<Vec<MeshId>, AssetIoError> {
        Ok(self
            .read_mesh(mesh)?
            .children
            .into_iter()
            .map(MeshId::new)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FsAssetStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAssetStore::new(dir.path());
        (dir, store)
    }

    fn write_png(store: &FsAssetStore, path: &str, color: [f32; 4]) {
        let mut image = RasterImage::new(2, 2);
        image.fill(color);
        let full = store.resolve(Path::new(path));
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, image.encode_png().unwrap()).unwrap();
    }

    #[test]
    fn test_unique_names_never_overwrite() {
        let (_dir, mut store) = store();
        let first = store
            .write_unique(Path::new("Textures"), "brick", "_baked", b"one")
            .unwrap();
        let second = store
            .write_unique(Path::new("Textures"), "brick", "_baked", b"two")
            .unwrap();

        assert_eq!(first, PathBuf::from("Textures/brick_baked.png"));
        assert_eq!(second, PathBuf::from("Textures/brick_baked 1.png"));
        assert_eq!(fs::read(store.resolve(&first)).unwrap(), b"one");
    }

    #[test]
    fn test_missing_sidecar_means_readable() {
        let (_dir, mut store) = store();
        write_png(&store, "Textures/a.png", [1.0; 4]);
        let image = ImageHandle::new("Textures/a.png");
        assert!(store.is_readable(&image).unwrap());

        store
            .set_import_settings(
                &image,
                &ImportSettings {
                    readable: false,
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!store.is_readable(&image).unwrap());
        assert!(store.load(&image).is_err());

        store.ensure_readable(&image).unwrap();
        assert!(store.is_readable(&image).unwrap());
        assert_eq!(store.load(&image).unwrap().width(), 2);
    }

    #[test]
    fn test_load_missing_image() {
        let (_dir, store) = store();
        let err = store.load(&ImageHandle::new("nope.png")).unwrap_err();
        assert!(matches!(err, AssetIoError::NotFound(_)));
    }

    #[test]
    fn test_material_round_trip_through_draft() {
        let (_dir, mut store) = store();
        let source = MaterialId::new("Materials/Brick.mat");
        let mut doc = MaterialDocument::new("S");
        doc.extra.insert("renderQueue".into(), 2000.into());
        fs::create_dir_all(store.resolve(Path::new("Materials"))).unwrap();
        store.replace_json(source.path(), &doc).unwrap();

        let draft = store.clone_material(&source).unwrap();
        let created = store
            .create_unique_asset(draft, Path::new("Materials"), "Brick", "_baked")
            .unwrap();

        assert_eq!(created, MaterialId::new("Materials/Brick_baked.mat"));
        let reread = store.read_material(&created).unwrap();
        assert_eq!(reread.shader, "S");
        assert_eq!(reread.extra["renderQueue"], 2000);
    }

    #[test]
    fn test_replace_slots_keeps_other_fields() {
        let (_dir, mut store) = store();
        let mesh = MeshId::new("Crate.mesh");
        fs::write(
            store.resolve(mesh.path()),
            r#"{ "name": "Crate", "materials": ["a.mat", null], "children": ["Lid.mesh"] }"#,
        )
        .unwrap();

        store
            .replace_material_slots(&mesh, vec![Some(MaterialId::new("a_baked.mat")), None])
            .unwrap();

        let doc = store.read_mesh(&mesh).unwrap();
        assert_eq!(doc.name, "Crate");
        assert_eq!(doc.materials, vec![Some(PathBuf::from("a_baked.mat")), None]);
        assert_eq!(
            store.children(&mesh).unwrap(),
            vec![MeshId::new("Lid.mesh")]
        );
        assert!(!store.resolve(Path::new("Crate.mesh.tmp")).exists());
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let (_dir, store) = store();
        fs::write(store.resolve(Path::new("Bad.mat")), "not json").unwrap();
        let err = store.shader_id(&MaterialId::new("Bad.mat")).unwrap_err();
        assert!(matches!(err, AssetIoError::Invalid { .. }));
    }

    #[test]
    fn test_relative_paths() {
        let (dir, store) = store();
        assert_eq!(
            store.relative(&dir.path().join("Materials/A.mat")),
            Some(PathBuf::from("Materials/A.mat"))
        );
        assert_eq!(
            store.relative(Path::new("Materials/A.mat")),
            Some(PathBuf::from("Materials/A.mat"))
        );
        assert_eq!(store.relative(Path::new("/elsewhere/A.mat")), None);
    }

    #[test]
    fn test_absolute_path_under_unnormalized_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Materials")).unwrap();
        let store = FsAssetStore::new(dir.path().join("Materials/.."));

        assert_eq!(
            store.relative(&dir.path().join("Materials/A.mat")),
            Some(PathBuf::from("Materials/A.mat"))
        );
        assert_eq!(
            store.relative(&dir.path().join("New/B.mat")),
            Some(PathBuf::from("New/B.mat"))
        );
    }

    #[test]
    fn test_absolute_path_under_current_dir_root() {
        let store = FsAssetStore::new(".");
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            store.relative(&cwd.join("Materials/M.mat")),
            Some(PathBuf::from("Materials/M.mat"))
        );
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_frees_the_name() {
        let (_dir, store) = store();
        let full = store.resolve(Path::new("brick_baked.png"));
        fs::write(&full, b"").unwrap();

        assert!(write_or_remove(FailingWriter, &full, b"pixels").is_err());
        assert!(!full.exists());
    }
}
