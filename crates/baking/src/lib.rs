//! tintbake baking core - folds material tints into texture pixels
//!
//! This crate provides the host-independent parts of the baker:
//! - [`registry`] - Shader binding registry (which texture/color pairs bake together)
//! - [`raster`] - Normalized RGBA raster with 8-bit and PNG conversion
//! - [`composite`] - Pixel compositor (RGB multiply, alpha preserved)
//! - [`engine`] - Step-wise material bake engine
//! - [`driver`] - Batch driver over a worklist of materials and meshes
//! - [`host`] - Collaborator traits the host asset store implements
//! - [`preview`] - Read-only accessors for presenting materials before a bake

pub mod composite;
pub mod constants;
pub mod driver;
pub mod engine;
pub mod error;
pub mod host;
pub mod preview;
pub mod raster;
pub mod registry;
pub mod types;
pub mod worklist;

#[cfg(test)]
pub(crate) mod testing;

pub use composite::*;
pub use constants::*;
pub use driver::*;
pub use engine::*;
pub use error::*;
pub use host::*;
pub use preview::*;
pub use raster::*;
pub use registry::*;
pub use types::*;
pub use worklist::*;

pub use tintbake_config::{BakerSettings, PropertyPair, ShaderConfigRecord, ShaderConfigSource};
