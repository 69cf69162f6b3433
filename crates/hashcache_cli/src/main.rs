//! hashcache CLI
//!
//! Records file digests and reports which files changed between runs.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(negative) => {
            if negative {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Runs the selected command. `Ok(true)` means a negative answer
/// (nothing changed, files differ) and maps to exit code 1.
fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::Update { files } => commands::update::run_update(cli, files).map(|_| false),
        Commands::Changed { files, dry_run } => {
            commands::changed::run_changed(cli, files, *dry_run).map(|any| !any)
        }
        Commands::Compare { first, second } => {
            commands::compare::run_compare(cli, first, second).map(|same| !same)
        }
        Commands::Prune => commands::prune::run_prune(cli).map(|_| false),
        Commands::Show => commands::show::run_show(cli).map(|_| false),
        Commands::Init { force } => commands::init::run_init(*force).map(|_| false),
    }
}
