//! Init command implementation

use hashcache_core::{CacheError, HashCacheConfig, OsFileSystem};
use miette::{IntoDiagnostic, Result};
use tracing::info;

pub fn run_init(force: bool) -> Result<()> {
    match HashCacheConfig::write_template(&OsFileSystem, ".", force) {
        Ok(path) => {
            info!("Created {}", path.display());
            Ok(())
        }
        Err(e @ CacheError::AlreadyExists { .. }) => Err(miette::miette!(
            help = "Use --force to overwrite.",
            "Config file {}",
            e
        )),
        Err(e) => Err(e).into_diagnostic(),
    }
}
