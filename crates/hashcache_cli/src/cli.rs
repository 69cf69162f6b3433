//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hashcache_core::{DigestAlgorithm, Encoding};

/// hashcache - Skip work on files whose content has not changed
#[derive(Parser)]
#[command(name = "hcache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Cache file name
    #[arg(long, global = true)]
    pub cache_file: Option<String>,

    /// Directory the cache file is stored in
    #[arg(long, global = true)]
    pub cache_root: Option<PathBuf>,

    /// Directory file keys are relative to
    #[arg(long, global = true)]
    pub project_root: Option<PathBuf>,

    /// Namespace key (defaults to the configured default key)
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Text encoding used to read files (utf-8, utf-16le, latin1, ascii, hex, base64)
    #[arg(long, global = true)]
    pub encoding: Option<Encoding>,

    /// Digest algorithm (sha1, sha256, blake3)
    #[arg(long, global = true)]
    pub algorithm: Option<DigestAlgorithm>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record the current digest of files
    Update {
        /// Files to record
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the files whose content changed since they were last recorded
    Changed {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Report changes without recording them
        #[arg(long)]
        dry_run: bool,
    },

    /// Compare two files by digest
    Compare {
        /// First file
        first: PathBuf,

        /// Second file
        second: PathBuf,
    },

    /// Remove entries for files that no longer exist
    Prune,

    /// Print the cache contents as JSON
    Show,

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}
