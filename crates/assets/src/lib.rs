//! Directory-backed host for the tintbake baker
//!
//! Implements the baking crate's host traits on a plain asset tree:
//! PNG images with optional `.import.json` sidecars, `*.mat` and `*.mesh`
//! JSON documents.

pub mod documents;
pub mod store;

use std::path::Path;

use baking::{MaterialId, MeshId, WorkItem};

pub use documents::{ImportSettings, MaterialDocument, MeshDocument};
pub use store::{
    FsAssetStore, IMPORT_SETTINGS_SUFFIX, MATERIAL_EXTENSION, MESH_EXTENSION,
    import_settings_path,
};

/// Work item for an asset path, by extension; `None` for anything that is
/// neither a material nor a mesh
pub fn work_item_for(path: &Path) -> Option<WorkItem> {
    match path.extension()?.to_str()? {
        MATERIAL_EXTENSION => Some(WorkItem::Material(MaterialId::new(path))),
        MESH_EXTENSION => Some(WorkItem::Mesh(MeshId::new(path))),
        _ => None,
    }
}
