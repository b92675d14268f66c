mod cli;
mod commands;
mod config;
mod render;

use std::process::ExitCode;

use adcraft_logging::{adcraft_debug, adcraft_info, LogDestination};
use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let loaded = config::load(cli.config.as_deref())?;
    let mut config = loaded.config;
    cli.apply_overrides(&mut config);

    let destination = match &config.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    adcraft_logging::initialize(destination, cli.log_level.into());
    match &loaded.source {
        Some(path) => adcraft_info!("Loaded config from {:?}", path),
        None => adcraft_debug!("No config file; using defaults"),
    }

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(commands::execute(cli.command, &config))
}
