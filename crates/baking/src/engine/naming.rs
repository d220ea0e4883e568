//! Output naming for baked assets

use std::path::{Path, PathBuf};

/// Directory and file stem of an asset path
///
/// Paths without a parent resolve to the empty (root) directory.
pub fn split_asset_path(path: &Path) -> (PathBuf, String) {
    let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (directory, stem)
}

/// Directory and base name for the image baked from `source` at `texture_key`
///
/// `Textures/brick.png` + `_MainTex` -> (`Textures`, `brick_MainTex`)
pub fn baked_image_base(source: &Path, texture_key: &str) -> (PathBuf, String) {
    let (directory, stem) = split_asset_path(source);
    (directory, format!("{stem}{texture_key}"))
}
