// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: CLI entry point for the mercury-run launcher.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! CLI entry point for the mercury-run launcher.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::LevelFilter;
use mercury_run::{
    load_config, resolve_config_path, LaunchPlan, Launcher, LauncherConfig, SystemRunner,
    DEFAULT_THREADS,
};

#[derive(Debug, Parser)]
#[command(
    author = "Lukas Bower",
    version,
    about = "Configure, build and launch a Mercury target"
)]
struct Cli {
    /// Target to build and run: ud, fb or main.
    target: String,

    /// Execution mode: normal, gdb or mdb.
    #[arg(short, long, default_value = "normal")]
    mode: String,

    /// Parallel jobs forwarded to the build system.
    #[arg(short = 'j', long, default_value_t = DEFAULT_THREADS)]
    threads: NonZeroU32,

    /// Project root used as working directory for every step.
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Launcher configuration TOML.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the planned steps without running them.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Enable debug logging.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()));
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Mode and target are validated before any config or filesystem access.
    let plan = LaunchPlan::resolve(
        &cli.target,
        &cli.mode,
        cli.threads,
        cli.root.clone(),
        LauncherConfig::default(),
    )?;
    let config = match resolve_config_path(cli.config, &cli.root) {
        Some(path) => {
            log::debug!("loading launcher config {}", path.display());
            load_config(&path)?
        }
        None => LauncherConfig::default(),
    };
    let plan = LaunchPlan { config, ..plan };

    if cli.dry_run {
        for line in plan.describe() {
            println!("[dry-run] {line}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut launcher = Launcher::new(SystemRunner);
    let status = launcher
        .execute(&plan)
        .with_context(|| format!("launch of '{}' in {} mode failed", plan.target, plan.mode))?;
    Ok(exit_code_for(status.code()))
}

fn exit_code_for(code: Option<i32>) -> ExitCode {
    match code {
        Some(0) => ExitCode::SUCCESS,
        Some(code) => u8::try_from(code)
            .map(ExitCode::from)
            .unwrap_or(ExitCode::FAILURE),
        None => ExitCode::FAILURE,
    }
}
