//! Compare command implementation

use std::path::Path;

use miette::{IntoDiagnostic, Result};

use crate::cli::Cli;

pub fn run_compare(cli: &Cli, first: &Path, second: &Path) -> Result<bool> {
    let config = super::load_config(cli)?;
    let cache = hashcache_core::HashCache::new(config).into_diagnostic()?;

    let identical = cache.compare_files(first, second, None).into_diagnostic()?;
    println!("{}", if identical { "identical" } else { "different" });

    Ok(identical)
}
