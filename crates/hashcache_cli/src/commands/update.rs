//! Update command implementation

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use tracing::{info, warn};

use crate::cli::Cli;

pub fn run_update(cli: &Cli, files: &[PathBuf]) -> Result<()> {
    let mut cache = super::open_cache(cli)?;
    let namespace = cli.namespace.as_deref();

    let mut updated = 0;
    for file in files {
        if cache.update_entry(file, namespace, None).into_diagnostic()? {
            updated += 1;
        } else {
            warn!("Skipping missing file: {}", file.display());
        }
    }

    cache.save(false).into_diagnostic()?;
    info!("Updated {} file(s)", updated);

    Ok(())
}
