//! # hashcache_core
//!
//! Persistent content-hash cache.
//!
//! This crate records a digest of each tracked file so that a build step can
//! skip files whose content has not changed since the last run.
//!
//! ## Cache Strategy
//!
//! 1. **Namespaced**: digests are grouped under caller-chosen namespace keys
//! 2. **Portable**: file keys are paths relative to the project root
//! 3. **Self-healing**: a corrupt cache file loads as an empty cache
//!
//! ## Storage
//!
//! The cache is a single JSON file with namespace keys and file keys in
//! alphabetical order, so it diffs cleanly under version control.
//!
//! ## Example
//!
//! ```rust,ignore
//! use hashcache_core::{HashCache, HashCacheConfig};
//!
//! let mut cache = HashCache::new(HashCacheConfig::new())?;
//! cache.load(None, false)?;
//! if cache.file_has_changed("src/style.css", None, None)? {
//!     rebuild_styles()?;
//! }
//! cache.save(true)?;
//! ```

mod config;
mod digest;
mod document;
mod encoding;
mod error;
pub mod fs;
mod manager;

pub use config::HashCacheConfig;
pub use digest::DigestAlgorithm;
pub use document::{CacheDocument, EntrySet};
pub use encoding::Encoding;
pub use error::CacheError;
pub use fs::{FileSystem, OsFileSystem};
pub use manager::HashCache;
