//! tintbake - bake material tint colors into textures

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;
mod config;

use args::{Cli, Command};
use config::AppConfig;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::new(&cli);

    let result = match &cli.command {
        Command::Configs => commands::configs(&config),
        Command::Inspect(selection) => commands::inspect(&config, selection),
        Command::Bake(args) => {
            config.apply_bake_args(args);
            commands::bake(&config, &args.selection)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
