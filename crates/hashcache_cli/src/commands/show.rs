//! Show command implementation

use miette::{IntoDiagnostic, Result};

use crate::cli::Cli;

pub fn run_show(cli: &Cli) -> Result<()> {
    let config = super::load_config(cli)?;
    let mut cache = hashcache_core::HashCache::new(config).into_diagnostic()?;
    cache.load(None, false).into_diagnostic()?;

    let json = match cli.namespace.as_deref() {
        Some(namespace) => {
            let entries = cache.document().entries(namespace).ok_or_else(|| {
                miette::miette!("Namespace '{}' not found in cache", namespace)
            })?;
            serde_json::to_string_pretty(entries).into_diagnostic()?
        }
        None => serde_json::to_string_pretty(cache.document()).into_diagnostic()?,
    };

    println!("{}", json);
    Ok(())
}
