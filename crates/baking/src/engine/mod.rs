//! Material bake engine
//!
//! Bakes one material's tinted texture pairs into new images and a derived
//! material. The work is exposed as a resumable [`MaterialBake`]: every call
//! to [`MaterialBake::step`] performs at most one expensive action (reimport,
//! pixel pass, image write, material save) and then hands control back with a
//! progress label, so a host loop can keep its UI responsive.

mod naming;

use std::sync::Arc;

use tintbake_config::{BakerSettings, PropertyPair};
use tracing::{debug, info};

use crate::composite::composite;
use crate::error::{AssetIoError, BakeError};
use crate::host::{BakeHost, MaterialDraft, MaterialStore};
use crate::raster::RasterImage;
use crate::registry::{ShaderBinding, ShaderBindingRegistry};
use crate::types::{BakeResult, BakedPairRecord, ImageHandle, MaterialId, Tint};

pub use naming::{baked_image_base, split_asset_path};

/// What one [`MaterialBake::step`] produced
#[derive(Debug, Clone, PartialEq)]
pub enum BakeStep {
    /// A sub-step finished; more work remains
    Progress(String),
    /// The bake is complete
    Finished(BakeResult),
}

/// A pair selected for baking, waiting on its next sub-step
#[derive(Debug, Clone)]
struct PendingPair {
    pair: PropertyPair,
    source: ImageHandle,
    tint: Tint,
}

#[derive(Debug)]
enum Phase {
    /// Looking for the next pair that needs baking
    Scan,
    /// Source is readable; next: load and composite
    Composite(PendingPair),
    /// Pixels are ready; next: encode and write
    Write { pending: PendingPair, image: RasterImage },
    /// All pairs handled; next: clone and save the material
    SaveMaterial,
    Done(BakeResult),
    Aborted,
}

/// Resumable bake of a single material
#[derive(Debug)]
pub struct MaterialBake {
    material: MaterialId,
    binding: Arc<ShaderBinding>,
    settings: BakerSettings,
    next_pair: usize,
    records: Vec<BakedPairRecord>,
    phase: Phase,
}

impl MaterialBake {
    /// Resolve the material's shader binding and prepare a bake
    ///
    /// Fails with [`BakeError::ConfigurationMissing`] when the registry has no
    /// binding for the material's shader.
    pub fn start<S: MaterialStore>(
        material: MaterialId,
        registry: &ShaderBindingRegistry,
        store: &S,
        settings: &BakerSettings,
    ) -> Result<Self, BakeError> {
        let shader_id = store
            .shader_id(&material)
            .map_err(|e| BakeError::asset_io(&material, e))?;
        let binding = registry
            .resolve(&shader_id)
            .ok_or_else(|| BakeError::ConfigurationMissing {
                material: material.clone(),
                shader_id,
            })?;
        Ok(Self::with_binding(material, binding, settings))
    }

    /// Prepare a bake against an already resolved binding
    pub fn with_binding(
        material: MaterialId,
        binding: Arc<ShaderBinding>,
        settings: &BakerSettings,
    ) -> Self {
        Self {
            material,
            binding,
            settings: settings.clone(),
            next_pair: 0,
            records: Vec::new(),
            phase: Phase::Scan,
        }
    }

    pub fn material(&self) -> &MaterialId {
        &self.material
    }

    pub fn binding(&self) -> &ShaderBinding {
        &self.binding
    }

    /// Rough completion in 0..=1: pairs examined, with the material save as
    /// one final unit
    pub fn progress(&self) -> f32 {
        match self.phase {
            Phase::Done(_) | Phase::Aborted => 1.0,
            _ => {
                let units = self.binding.pairs().len() + 1;
                let done = match self.phase {
                    Phase::SaveMaterial => units - 1,
                    _ => self.next_pair.saturating_sub(1),
                };
                done as f32 / units as f32
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Done(_) | Phase::Aborted)
    }

    /// Advance to the next suspension point
    ///
    /// After an error the bake is aborted and every further call fails with
    /// [`BakeError::Aborted`]. Once finished, further calls return the same
    /// result again.
    pub fn step<H: BakeHost>(&mut self, host: &mut H) -> Result<BakeStep, BakeError> {
        let result = self.advance(host);
        if result.is_err() {
            self.phase = Phase::Aborted;
        }
        result
    }

    fn advance<H: BakeHost>(&mut self, host: &mut H) -> Result<BakeStep, BakeError> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Scan) {
                Phase::Scan => {
                    let Some(pair) = self.binding.pairs().get(self.next_pair).cloned() else {
                        if self.records.is_empty() {
                            info!("{}: No textures to bake.", self.material.name());
                            self.complete(None);
                            continue;
                        }
                        self.phase = Phase::SaveMaterial;
                        continue;
                    };
                    self.next_pair += 1;

                    let Some(pending) = self.select_pair(host, pair)? else {
                        continue;
                    };

                    let readable = host
                        .is_readable(&pending.source)
                        .map_err(|e| BakeError::asset_io(&self.material, e))?;
                    if readable {
                        self.phase = Phase::Composite(pending);
                        continue;
                    }

                    debug!("Reimporting {} as readable", pending.source);
                    host.ensure_readable(&pending.source)
                        .map_err(|e| BakeError::asset_io(&self.material, e))?;
                    let label = format!("Changing settings for {}", pending.source.file_name());
                    self.phase = Phase::Composite(pending);
                    return Ok(BakeStep::Progress(label));
                }
                Phase::Composite(pending) => {
                    let source = host
                        .load(&pending.source)
                        .map_err(|e| BakeError::asset_io(&self.material, e))?;
                    let image = composite(&source, pending.tint);
                    let label = format!("Baking color into {}", pending.source.file_name());
                    self.phase = Phase::Write { pending, image };
                    return Ok(BakeStep::Progress(label));
                }
                Phase::Write { pending, image } => {
                    let record = self.write_image(host, pending, &image)?;
                    let label = format!("Wrote {}", record.image);
                    self.records.push(record);
                    self.phase = Phase::Scan;
                    return Ok(BakeStep::Progress(label));
                }
                Phase::SaveMaterial => {
                    let baked = self.save_material(host)?;
                    info!(
                        "{}: Successfully baked, saved in file '{}'.",
                        self.material.name(),
                        baked
                    );
                    let label = format!("Saved new material {}", baked);
                    self.complete(Some(baked));
                    return Ok(BakeStep::Progress(label));
                }
                Phase::Done(result) => {
                    self.phase = Phase::Done(result.clone());
                    return Ok(BakeStep::Finished(result));
                }
                Phase::Aborted => {
                    self.phase = Phase::Aborted;
                    return Err(BakeError::Aborted(self.material.clone()));
                }
            }
        }
    }

    /// Apply the skip rules to one pair
    fn select_pair<H: BakeHost>(
        &self,
        host: &H,
        pair: PropertyPair,
    ) -> Result<Option<PendingPair>, BakeError> {
        let io = |e| BakeError::asset_io(&self.material, e);

        let Some(source) = host.texture(&self.material, &pair.texture_key).map_err(io)? else {
            debug!(
                "{}: no texture at '{}', skipping",
                self.material.name(),
                pair.texture_key
            );
            return Ok(None);
        };
        let Some(tint) = host.tint(&self.material, &pair.color_key).map_err(io)? else {
            debug!(
                "{}: no color property '{}', skipping",
                self.material.name(),
                pair.color_key
            );
            return Ok(None);
        };
        if tint.is_neutral() {
            debug!(
                "{}: '{}' is white, skipping '{}'",
                self.material.name(),
                pair.color_key,
                pair.texture_key
            );
            return Ok(None);
        }
        Ok(Some(PendingPair { pair, source, tint }))
    }

    fn write_image<H: BakeHost>(
        &self,
        host: &mut H,
        pending: PendingPair,
        image: &RasterImage,
    ) -> Result<BakedPairRecord, BakeError> {
        let io = |e| BakeError::asset_io(&self.material, e);

        let png = image
            .encode_png()
            .map_err(|source| AssetIoError::Raster {
                path: pending.source.path().to_path_buf(),
                source,
            })
            .map_err(io)?;
        let (directory, base_name) =
            baked_image_base(pending.source.path(), &pending.pair.texture_key);
        let path = host
            .write_unique(&directory, &base_name, &self.settings.texture_suffix, &png)
            .map_err(io)?;
        let image = host.import_and_make_readable(&path).map_err(io)?;

        debug!(
            "{}: baked '{}' x '{}' into {}",
            self.material.name(),
            pending.pair.texture_key,
            pending.pair.color_key,
            image
        );
        Ok(BakedPairRecord {
            image,
            texture_key: pending.pair.texture_key,
            color_key: pending.pair.color_key,
        })
    }

    fn save_material<H: BakeHost>(&self, host: &mut H) -> Result<MaterialId, BakeError> {
        let io = |e| BakeError::asset_io(&self.material, e);

        let mut draft = host.clone_material(&self.material).map_err(io)?;
        for record in &self.records {
            draft.set_tint(&record.color_key, Tint::WHITE);
            draft.set_texture(&record.texture_key, &record.image);
        }
        let (directory, base_name) = split_asset_path(self.material.path());
        host.create_unique_asset(draft, &directory, &base_name, &self.settings.material_suffix)
            .map_err(io)
    }

    fn complete(&mut self, baked_material: Option<MaterialId>) {
        self.phase = Phase::Done(BakeResult {
            material: self.material.clone(),
            baked_pairs: std::mem::take(&mut self.records),
            baked_material,
        });
    }
}

/// Bake a material to completion, logging each sub-step
pub fn bake_material<H: BakeHost>(
    material: &MaterialId,
    registry: &ShaderBindingRegistry,
    host: &mut H,
    settings: &BakerSettings,
) -> Result<BakeResult, BakeError> {
    let mut bake = MaterialBake::start(material.clone(), registry, &*host, settings)?;
    loop {
        match bake.step(host)? {
            BakeStep::Progress(label) => debug!("{}: {}", material.name(), label),
            BakeStep::Finished(result) => return Ok(result),
        }
    }
}
