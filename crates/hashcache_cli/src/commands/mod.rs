//! Command implementations

pub mod changed;
pub mod compare;
pub mod init;
pub mod prune;
pub mod show;
pub mod update;

use miette::{IntoDiagnostic, Result};
use tracing::info;

use hashcache_core::{HashCache, HashCacheConfig};

use crate::cli::Cli;

/// Resolves the configuration: `--config`, then a discovered config file in
/// the current directory, then defaults. Command-line options override it.
pub fn load_config(cli: &Cli) -> Result<HashCacheConfig> {
    let mut config = if let Some(ref path) = cli.config {
        HashCacheConfig::from_file(path).into_diagnostic()?
    } else if let Some(path) = HashCacheConfig::discover(".") {
        info!("Using config: {}", path.display());
        HashCacheConfig::from_file(&path).into_diagnostic()?
    } else {
        HashCacheConfig::default()
    };

    if let Some(ref cache_file) = cli.cache_file {
        config.cache_file = cache_file.clone();
    }
    if let Some(ref cache_root) = cli.cache_root {
        config.cache_root = cache_root.clone();
    }
    if let Some(ref project_root) = cli.project_root {
        config.project_root = project_root.clone();
    }
    if let Some(encoding) = cli.encoding {
        config.encoding = encoding;
    }
    if let Some(algorithm) = cli.algorithm {
        config.algorithm = algorithm;
    }

    Ok(config)
}

/// Builds the cache and loads it, creating the selected namespace.
pub fn open_cache(cli: &Cli) -> Result<HashCache> {
    let config = load_config(cli)?;
    let mut cache = HashCache::new(config).into_diagnostic()?;
    cache
        .load(cli.namespace.as_deref(), false)
        .into_diagnostic()?;
    Ok(cache)
}
