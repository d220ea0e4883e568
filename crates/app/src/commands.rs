//! Subcommand implementations

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use baking::{
    AssetIoError, BatchDriver, DriverStatus, MeshId, ShaderBindingRegistry, WorkItem, WorkList,
    describe_item,
};
use thiserror::Error;
use tintbake_assets::{FsAssetStore, work_item_for};
use tintbake_config::DirectoryConfigSource;
use tracing::{info, warn};

use crate::args::Selection;
use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("{} is neither a material (.mat) nor a mesh (.mesh)", .0.display())]
    InvalidSelection(PathBuf),
    #[error("{} is outside the asset root {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },
    #[error("cannot walk the children of {mesh}: {source}")]
    Hierarchy {
        mesh: MeshId,
        #[source]
        source: AssetIoError,
    },
}

fn load_registry(config: &AppConfig) -> Result<ShaderBindingRegistry> {
    let registry = ShaderBindingRegistry::new();
    let report = registry
        .rescan(&DirectoryConfigSource::new(&config.configs))
        .with_context(|| format!("reading shader settings from {}", config.configs.display()))?;
    if report.skipped > 0 {
        warn!("{} shader setting record(s) skipped", report.skipped);
    }
    if registry.is_empty() {
        warn!("No shader settings found under {}", config.configs.display());
    }
    Ok(registry)
}

/// Turn command line paths into a worklist, rejecting anything that is not
/// a material or mesh before the baker sees it
pub fn build_worklist(
    store: &FsAssetStore,
    selection: &Selection,
) -> Result<WorkList, SelectionError> {
    let mut list = WorkList::new();
    for path in &selection.paths {
        let relative = store
            .relative(path)
            .ok_or_else(|| SelectionError::OutsideRoot {
                path: path.clone(),
                root: store.root().to_path_buf(),
            })?;
        match work_item_for(&relative) {
            Some(WorkItem::Mesh(mesh)) if selection.recursive => {
                list.add_mesh_with_children(mesh.clone(), store)
                    .map_err(|source| SelectionError::Hierarchy { mesh, source })?;
            }
            Some(WorkItem::Mesh(mesh)) => list.add_mesh(mesh),
            Some(WorkItem::Material(material)) => list.add_material(material),
            None => return Err(SelectionError::InvalidSelection(path.clone())),
        }
    }
    Ok(list)
}

pub fn configs(config: &AppConfig) -> Result<ExitCode> {
    let registry = load_registry(config)?;
    for shader_id in registry.shader_ids() {
        let Some(binding) = registry.resolve(&shader_id) else {
            continue;
        };
        println!("{shader_id}");
        for pair in binding.pairs() {
            println!("  {} x {}", pair.texture_key, pair.color_key);
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub fn inspect(config: &AppConfig, selection: &Selection) -> Result<ExitCode> {
    let registry = load_registry(config)?;
    let store = FsAssetStore::new(&config.root);
    let list = build_worklist(&store, selection)?;

    let mut failed = false;
    for item in list.items() {
        match describe_item(&registry, &store, item) {
            Ok(preview) => print!("{preview}"),
            Err(e) => {
                warn!("{}: {}", item.label(), e);
                failed = true;
            }
        }
    }
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

pub fn bake(config: &AppConfig, selection: &Selection) -> Result<ExitCode> {
    let registry = load_registry(config)?;
    let mut store = FsAssetStore::new(&config.root);
    let list = build_worklist(&store, selection)?;

    let mut driver = BatchDriver::new(Arc::new(registry), config.settings.clone());
    driver.start(list.into_items());
    let summary = loop {
        match driver.step(&mut store) {
            DriverStatus::Progress(progress) => {
                info!("[{:>3.0}%] {}", progress.fraction * 100.0, progress.label);
            }
            DriverStatus::ItemDone(_) => {}
            DriverStatus::Finished(summary) => break summary,
            DriverStatus::Idle => break driver.summary(),
        }
    };

    for (original, baked) in driver.substitutions().iter() {
        println!("{} -> {}", original, baked);
    }
    println!("{summary}");
    Ok(if summary.failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
