//! Command line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Bake material tint colors into new textures
#[derive(Parser, Debug)]
#[command(
    name = "tintbake",
    version,
    about = "Bake material tint colors into new textures",
    long_about = "Bakes the tint color of each configured texture/color pair into a copy of \
        the texture, then writes a new material that uses the baked texture with a white tint.\n\n\
        Shader bindings are read from *.bakerconfig.json files. Output suffixes can also be set \
        with TINTBAKE_TEXTURE_SUFFIX and TINTBAKE_MATERIAL_SUFFIX."
)]
pub struct Cli {
    /// Asset root; material, mesh and image paths are relative to it
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Directory searched for shader binding files (defaults to the asset root)
    #[arg(long, global = true)]
    pub configs: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the shader bindings found in the config directory
    Configs,
    /// Show what baking the selection would do, without writing anything
    Inspect(Selection),
    /// Bake the selection
    Bake(BakeArgs),
}

#[derive(Args, Debug)]
pub struct Selection {
    /// Material (.mat) or mesh (.mesh) files
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Also select every child mesh below each selected mesh
    #[arg(short, long)]
    pub recursive: bool,
}

#[derive(Args, Debug)]
pub struct BakeArgs {
    #[command(flatten)]
    pub selection: Selection,

    /// Suffix appended to baked texture names
    #[arg(long)]
    pub texture_suffix: Option<String>,

    /// Suffix appended to baked material names
    #[arg(long)]
    pub material_suffix: Option<String>,
}
