//! Progress and outcome reporting for batch bakes.

use std::fmt;

use crate::types::{MaterialId, MeshId, WorkItem};

/// Progress tuple handed to the host after each sub-step
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub label: String,
    /// Whole-batch completion in 0..=1
    pub fraction: f32,
}

/// What happened to one material during a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialOutcome {
    /// Baked into a new material
    Baked(MaterialId),
    /// Already baked earlier in this run; the earlier result was reused
    Reused(MaterialId),
    /// No pair needed baking
    NothingToBake,
    /// The bake failed; the message names the material and cause
    Failed(String),
}

impl MaterialOutcome {
    /// The replacement material, if there is one
    pub fn replacement(&self) -> Option<&MaterialId> {
        match self {
            Self::Baked(m) | Self::Reused(m) => Some(m),
            Self::NothingToBake | Self::Failed(_) => None,
        }
    }
}

/// Result of processing a mesh's material slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshReport {
    pub mesh: MeshId,
    /// One entry per distinct slot material, in first-slot order
    pub materials: Vec<(MaterialId, MaterialOutcome)>,
    /// Slots that now reference a baked material
    pub replaced_slots: usize,
    pub total_slots: usize,
    /// Set when the slot rewrite itself failed
    pub error: Option<String>,
}

impl MeshReport {
    /// Distinct materials that have a baked replacement
    pub fn substituted_count(&self) -> usize {
        self.materials
            .iter()
            .filter(|(_, outcome)| outcome.replacement().is_some())
            .count()
    }

    pub fn is_nothing_to_substitute(&self) -> bool {
        self.substituted_count() == 0
    }
}

impl fmt::Display for MeshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            return write!(f, "{}: failed to replace materials: {}", self.mesh.name(), error);
        }
        if self.is_nothing_to_substitute() {
            write!(f, "{}: No material to bake.", self.mesh.name())
        } else {
            write!(
                f,
                "{}: baked {} of {} materials.",
                self.mesh.name(),
                self.substituted_count(),
                self.materials.len()
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Material(MaterialOutcome),
    Mesh(MeshReport),
    /// The item could not be started (e.g. the mesh's slots were unreadable)
    Failed(String),
}

/// Emitted once per work item when it completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub item: WorkItem,
    pub outcome: ItemOutcome,
}

impl fmt::Display for ItemReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            ItemOutcome::Material(MaterialOutcome::Baked(baked)) => {
                write!(f, "{} -> {}", self.item.label(), baked)
            }
            ItemOutcome::Material(MaterialOutcome::Reused(baked)) => {
                write!(f, "{} -> {} (already baked)", self.item.label(), baked)
            }
            ItemOutcome::Material(MaterialOutcome::NothingToBake) => {
                write!(f, "{}: No textures to bake.", self.item.label())
            }
            ItemOutcome::Material(MaterialOutcome::Failed(message))
            | ItemOutcome::Failed(message) => {
                write!(f, "{} failed: {}", self.item.label(), message)
            }
            ItemOutcome::Mesh(report) => write!(f, "{report}"),
        }
    }
}

/// Per-material counts over a batch run
///
/// `failed` also counts mesh items whose slots could not be read or
/// rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub baked: usize,
    pub skipped: usize,
    pub failed: usize,
    pub reused: usize,
    /// Work items completed
    pub items: usize,
}

impl BatchSummary {
    pub(crate) fn record(&mut self, outcome: &MaterialOutcome) {
        match outcome {
            MaterialOutcome::Baked(_) => self.baked += 1,
            MaterialOutcome::Reused(_) => self.reused += 1,
            MaterialOutcome::NothingToBake => self.skipped += 1,
            MaterialOutcome::Failed(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} item(s): {} baked, {} skipped, {} failed, {} reused",
            self.items, self.baked, self.skipped, self.failed, self.reused
        )
    }
}
