//! Prune command implementation

use miette::{IntoDiagnostic, Result};

use crate::cli::Cli;

pub fn run_prune(cli: &Cli) -> Result<()> {
    let mut cache = super::open_cache(cli)?;

    let removed = cache.prune_entries();
    cache.save(false).into_diagnostic()?;

    println!("Pruned {} stale entries", removed);
    Ok(())
}
