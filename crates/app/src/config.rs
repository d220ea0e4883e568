//! Run configuration assembled from the command line and environment

use std::path::PathBuf;

use tintbake_config::BakerSettings;

use crate::args::{BakeArgs, Cli};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub root: PathBuf,
    pub configs: PathBuf,
    pub settings: BakerSettings,
}

impl AppConfig {
    /// Environment first, then command line overrides
    pub fn new(cli: &Cli) -> Self {
        Self::with_settings(cli, BakerSettings::from_env())
    }

    fn with_settings(cli: &Cli, settings: BakerSettings) -> Self {
        Self {
            root: cli.root.clone(),
            configs: cli.configs.clone().unwrap_or_else(|| cli.root.clone()),
            settings,
        }
    }

    pub fn apply_bake_args(&mut self, args: &BakeArgs) {
        if let Some(suffix) = &args.texture_suffix {
            self.settings.texture_suffix = suffix.clone();
        }
        if let Some(suffix) = &args.material_suffix {
            self.settings.material_suffix = suffix.clone();
        }
    }
}
