//! Shader binding registry: shader id -> texture/color pairs eligible for baking.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use tintbake_config::{PropertyPair, ShaderConfigRecord, ShaderConfigSource};
use tracing::{debug, info, warn};

use crate::error::RegistryError;

/// The bakeable property pairs declared for one shader
///
/// Pair order is bake order. Texture keys are unique within a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderBinding {
    shader_id: String,
    pairs: Vec<PropertyPair>,
}

impl ShaderBinding {
    /// Build a binding, dropping pairs that repeat an earlier texture key
    pub fn new(shader_id: impl Into<String>, pairs: Vec<PropertyPair>) -> Self {
        let shader_id = shader_id.into();
        let mut seen = HashSet::new();
        let pairs = pairs
            .into_iter()
            .filter(|pair| {
                let first = seen.insert(pair.texture_key.clone());
                if !first {
                    warn!(
                        "Shader '{}': texture key '{}' listed more than once, keeping the first pair",
                        shader_id, pair.texture_key
                    );
                }
                first
            })
            .collect();
        Self { shader_id, pairs }
    }

    pub fn shader_id(&self) -> &str {
        &self.shader_id
    }

    pub fn pairs(&self) -> &[PropertyPair] {
        &self.pairs
    }

    /// A binding with no pairs is valid: the shader has nothing composable
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Counts from one rescan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RescanReport {
    /// Bindings in the new table
    pub loaded: usize,
    /// Records ignored because they name no shader
    pub skipped: usize,
}

type BindingTable = HashMap<String, Arc<ShaderBinding>>;

/// Process-scoped table of shader bindings
///
/// Readers always observe a complete table: [`rescan`](Self::rescan) builds
/// the replacement off to the side and swaps it in under the write lock.
/// Bindings handed out by [`resolve`](Self::resolve) stay valid after a
/// rescan replaces them.
#[derive(Debug, Default)]
pub struct ShaderBindingRegistry {
    table: RwLock<Arc<BindingTable>>,
}

impl ShaderBindingRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry populated from in-memory records
    pub fn from_records(records: Vec<ShaderConfigRecord>) -> Self {
        let (table, _) = Self::build_table(records);
        Self {
            table: RwLock::new(Arc::new(table)),
        }
    }

    /// Look up the binding for a shader
    ///
    /// `None` means no config exists for the shader, which is distinct from
    /// a config with an empty pair list.
    pub fn resolve(&self, shader_id: &str) -> Option<Arc<ShaderBinding>> {
        self.snapshot().get(shader_id).cloned()
    }

    /// Replace the whole table with the records `source` yields
    ///
    /// If the source fails the current table is kept.
    pub fn rescan<S>(&self, source: &S) -> Result<RescanReport, RegistryError>
    where
        S: ShaderConfigSource + ?Sized,
    {
        let records = source.records()?;
        let (table, report) = Self::build_table(records);

        *self.table.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(table);

        info!("{} shader settings found", report.loaded);
        Ok(report)
    }

    /// Number of shaders with a binding
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Shader ids with a binding, sorted
    pub fn shader_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.snapshot().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn snapshot(&self) -> Arc<BindingTable> {
        Arc::clone(&self.table.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn build_table(records: Vec<ShaderConfigRecord>) -> (BindingTable, RescanReport) {
        let mut table = BindingTable::new();
        let mut report = RescanReport::default();

        for record in records {
            let Some(shader_id) = record.shader_id().map(str::to_owned) else {
                debug!("Skipping shader config without a target shader");
                report.skipped += 1;
                continue;
            };
            let binding = ShaderBinding::new(shader_id.clone(), record.textures);
            if table.insert(shader_id.clone(), Arc::new(binding)).is_some() {
                warn!(
                    "Shader '{}' is configured more than once, using the last config",
                    shader_id
                );
            }
        }

        report.loaded = table.len();
        (table, report)
    }
}
