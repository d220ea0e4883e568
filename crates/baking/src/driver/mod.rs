//! Batch driver
//!
//! Walks a worklist of materials and meshes, baking each one through the
//! [`MaterialBake`] engine. The driver is a single-threaded state machine:
//! the host calls [`BatchDriver::step`] from its own loop (one call per
//! editor frame, say) and gets back a progress tuple, an item report or the
//! final summary. Failures stay inside the item that caused them.

mod report;
mod substitution;

use std::sync::Arc;

use tintbake_config::BakerSettings;
use tracing::{debug, info, warn};

use crate::engine::{BakeStep, MaterialBake};
use crate::host::{BakeHost, MeshStore};
use crate::registry::ShaderBindingRegistry;
use crate::types::{MaterialId, MeshId, WorkItem};

pub use report::{
    BatchSummary, ItemOutcome, ItemReport, MaterialOutcome, MeshReport, Progress,
};
pub use substitution::MaterialSubstitution;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DriverState {
    #[default]
    Idle,
    Running,
}

/// What one [`BatchDriver::step`] produced
#[derive(Debug, Clone, PartialEq)]
pub enum DriverStatus {
    /// Nothing is running
    Idle,
    /// A sub-step finished
    Progress(Progress),
    /// A work item finished
    ItemDone(ItemReport),
    /// The worklist is exhausted; the driver is idle again
    Finished(BatchSummary),
}

/// Shared state a running item needs
struct RunContext<'a> {
    registry: &'a ShaderBindingRegistry,
    settings: &'a BakerSettings,
    substitutions: &'a mut MaterialSubstitution,
    summary: &'a mut BatchSummary,
}

enum TaskProgress<T> {
    Step(String, f32),
    Done(T),
}

/// Drive one material's bake by a single step
///
/// Materials already substituted in this run are not baked again.
fn drive_material<H: BakeHost>(
    bake: &mut Option<MaterialBake>,
    original: &MaterialId,
    ctx: &mut RunContext<'_>,
    host: &mut H,
) -> TaskProgress<MaterialOutcome> {
    let mut running = match bake.take() {
        Some(running) => running,
        None => {
            if let Some(baked) = ctx.substitutions.get(original) {
                debug!("{} already baked as {}, reusing", original, baked);
                let outcome = MaterialOutcome::Reused(baked.clone());
                ctx.summary.record(&outcome);
                return TaskProgress::Done(outcome);
            }
            match MaterialBake::start(original.clone(), ctx.registry, &*host, ctx.settings) {
                Ok(started) => started,
                Err(e) => {
                    warn!("{}", e);
                    let outcome = MaterialOutcome::Failed(e.to_string());
                    ctx.summary.record(&outcome);
                    return TaskProgress::Done(outcome);
                }
            }
        }
    };

    let outcome = match running.step(host) {
        Ok(BakeStep::Progress(label)) => {
            let fraction = running.progress();
            *bake = Some(running);
            return TaskProgress::Step(label, fraction);
        }
        Ok(BakeStep::Finished(result)) => match result.baked_material {
            Some(baked) => {
                ctx.substitutions.insert(original.clone(), baked.clone());
                MaterialOutcome::Baked(baked)
            }
            None => MaterialOutcome::NothingToBake,
        },
        Err(e) => {
            warn!("{}", e);
            MaterialOutcome::Failed(e.to_string())
        }
    };
    ctx.summary.record(&outcome);
    TaskProgress::Done(outcome)
}

/// Bake state for a mesh item
struct MeshTask {
    mesh: MeshId,
    slots: Vec<Option<MaterialId>>,
    /// Slot materials without repeats, in first-slot order
    distinct: Vec<MaterialId>,
    next: usize,
    bake: Option<MaterialBake>,
    local: MaterialSubstitution,
    outcomes: Vec<(MaterialId, MaterialOutcome)>,
}

impl MeshTask {
    fn new(mesh: MeshId, slots: Vec<Option<MaterialId>>) -> Self {
        let mut distinct: Vec<MaterialId> = Vec::new();
        for material in slots.iter().flatten() {
            if !distinct.contains(material) {
                distinct.push(material.clone());
            }
        }
        Self {
            mesh,
            slots,
            distinct,
            next: 0,
            bake: None,
            local: MaterialSubstitution::new(),
            outcomes: Vec::new(),
        }
    }

    fn advance<H: BakeHost + MeshStore>(
        &mut self,
        ctx: &mut RunContext<'_>,
        host: &mut H,
    ) -> TaskProgress<MeshReport> {
        while let Some(material) = self.distinct.get(self.next).cloned() {
            match drive_material(&mut self.bake, &material, ctx, host) {
                TaskProgress::Step(label, fraction) => {
                    let done = (self.next as f32 + fraction) / self.distinct.len() as f32;
                    return TaskProgress::Step(label, done);
                }
                TaskProgress::Done(outcome) => {
                    if let Some(baked) = outcome.replacement() {
                        self.local.insert(material.clone(), baked.clone());
                    }
                    self.outcomes.push((material, outcome));
                    self.next += 1;
                }
            }
        }
        TaskProgress::Done(self.apply(ctx, host))
    }

    /// Rewrite the mesh's slot set in one host call
    fn apply<H: MeshStore>(&mut self, ctx: &mut RunContext<'_>, host: &mut H) -> MeshReport {
        let mut report = MeshReport {
            mesh: self.mesh.clone(),
            materials: std::mem::take(&mut self.outcomes),
            replaced_slots: 0,
            total_slots: self.slots.len(),
            error: None,
        };
        if self.local.is_empty() {
            return report;
        }

        let (slots, replaced) = self.local.apply_to_slots(&self.slots);
        match host.replace_material_slots(&self.mesh, slots) {
            Ok(()) => {
                for (original, baked) in self.local.iter() {
                    info!("{}:{} -> {}.", self.mesh.name(), original.name(), baked.name());
                }
                report.replaced_slots = replaced;
            }
            Err(e) => {
                warn!("{}: failed to replace materials: {}", self.mesh.name(), e);
                ctx.summary.failed += 1;
                report.error = Some(e.to_string());
            }
        }
        report
    }
}

enum ItemTask {
    Material {
        original: MaterialId,
        bake: Option<MaterialBake>,
    },
    Mesh(MeshTask),
}

impl ItemTask {
    fn begin<H: MeshStore>(item: &WorkItem, host: &H) -> Result<Self, String> {
        match item {
            WorkItem::Material(material) => Ok(Self::Material {
                original: material.clone(),
                bake: None,
            }),
            WorkItem::Mesh(mesh) => {
                let slots = host
                    .material_slots(mesh)
                    .map_err(|e| format!("cannot read material slots: {e}"))?;
                Ok(Self::Mesh(MeshTask::new(mesh.clone(), slots)))
            }
        }
    }

    fn advance<H: BakeHost + MeshStore>(
        &mut self,
        ctx: &mut RunContext<'_>,
        host: &mut H,
    ) -> TaskProgress<ItemOutcome> {
        match self {
            Self::Material { original, bake } => match drive_material(bake, original, ctx, host) {
                TaskProgress::Step(label, fraction) => TaskProgress::Step(label, fraction),
                TaskProgress::Done(outcome) => TaskProgress::Done(ItemOutcome::Material(outcome)),
            },
            Self::Mesh(task) => match task.advance(ctx, host) {
                TaskProgress::Step(label, fraction) => TaskProgress::Step(label, fraction),
                TaskProgress::Done(report) => TaskProgress::Done(ItemOutcome::Mesh(report)),
            },
        }
    }
}

/// Step-wise batch bake over a worklist
///
/// Substitutions accumulate in an add-only map for the current run. Stopping
/// early (see [`cancel`](Self::cancel)) keeps everything already baked.
pub struct BatchDriver {
    registry: Arc<ShaderBindingRegistry>,
    settings: BakerSettings,
    state: DriverState,
    items: Vec<WorkItem>,
    cursor: usize,
    task: Option<ItemTask>,
    substitutions: MaterialSubstitution,
    summary: BatchSummary,
}

impl BatchDriver {
    pub fn new(registry: Arc<ShaderBindingRegistry>, settings: BakerSettings) -> Self {
        Self {
            registry,
            settings,
            state: DriverState::Idle,
            items: Vec::new(),
            cursor: 0,
            task: None,
            substitutions: MaterialSubstitution::new(),
            summary: BatchSummary::default(),
        }
    }

    /// Begin a new run over `items`, discarding the previous run's state
    pub fn start(&mut self, items: Vec<WorkItem>) {
        info!("Baking {} work item(s)", items.len());
        self.items = items;
        self.cursor = 0;
        self.task = None;
        self.substitutions = MaterialSubstitution::new();
        self.summary = BatchSummary::default();
        self.state = DriverState::Running;
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// Substitutions produced so far in this run
    pub fn substitutions(&self) -> &MaterialSubstitution {
        &self.substitutions
    }

    pub fn summary(&self) -> BatchSummary {
        self.summary
    }

    /// Stop the run. Nothing is rolled back.
    pub fn cancel(&mut self) -> BatchSummary {
        if self.is_running() {
            warn!(
                "Bake cancelled after {} of {} item(s); keeping {} substitution(s)",
                self.cursor,
                self.items.len(),
                self.substitutions.len()
            );
        }
        self.state = DriverState::Idle;
        self.task = None;
        self.summary
    }

    /// Advance the run by one sub-step
    pub fn step<H: BakeHost + MeshStore>(&mut self, host: &mut H) -> DriverStatus {
        if !self.is_running() {
            return DriverStatus::Idle;
        }
        let Some(item) = self.items.get(self.cursor).cloned() else {
            self.state = DriverState::Idle;
            info!("Bake finished: {}", self.summary);
            return DriverStatus::Finished(self.summary);
        };

        let mut task = match self.task.take() {
            Some(task) => task,
            None => match ItemTask::begin(&item, &*host) {
                Ok(task) => task,
                Err(message) => {
                    warn!("{}: {}", item.label(), message);
                    self.summary.failed += 1;
                    return self.complete(item, ItemOutcome::Failed(message));
                }
            },
        };

        let mut ctx = RunContext {
            registry: &self.registry,
            settings: &self.settings,
            substitutions: &mut self.substitutions,
            summary: &mut self.summary,
        };
        match task.advance(&mut ctx, host) {
            TaskProgress::Step(label, item_fraction) => {
                self.task = Some(task);
                let fraction = (self.cursor as f32 + item_fraction) / self.items.len() as f32;
                DriverStatus::Progress(Progress {
                    label: format!("{}: {}", item.label(), label),
                    fraction: fraction.clamp(0.0, 1.0),
                })
            }
            TaskProgress::Done(outcome) => self.complete(item, outcome),
        }
    }

    fn complete(&mut self, item: WorkItem, outcome: ItemOutcome) -> DriverStatus {
        self.cursor += 1;
        self.summary.items += 1;
        let report = ItemReport { item, outcome };
        info!("{}", report);
        DriverStatus::ItemDone(report)
    }
}
