//! Changed command implementation

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use tracing::debug;

use crate::cli::Cli;

/// Prints every changed file on its own line. Returns whether any changed.
pub fn run_changed(cli: &Cli, files: &[PathBuf], dry_run: bool) -> Result<bool> {
    let mut cache = super::open_cache(cli)?;
    let namespace = cli.namespace.as_deref();

    let mut any_changed = false;
    for file in files {
        let result = if dry_run {
            cache.peek_changed(file, namespace, None)
        } else {
            cache.file_has_changed(file, namespace, None)
        };
        let changed = result.into_diagnostic()?;

        if changed {
            println!("{}", file.display());
            any_changed = true;
        } else {
            debug!("Unchanged: {}", file.display());
        }
    }

    if !dry_run {
        cache.save(false).into_diagnostic()?;
    }

    Ok(any_changed)
}
