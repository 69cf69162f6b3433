//! Cache error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in the cache system.
///
/// A missing input file is not an error: operations report it through their
/// `false` / empty-digest return values. A corrupt cache file is not an error
/// either; it is replaced with an empty document on load.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O failure other than "file not found".
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file that cannot be keyed relative to the project root.
    #[error("{} has no path relative to the project root", path.display())]
    NoRelativePath {
        /// The absolute path of the file.
        path: PathBuf,
    },

    /// A file that would be overwritten without being asked to.
    #[error("{} already exists", path.display())]
    AlreadyExists {
        /// The existing file.
        path: PathBuf,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text encoding name that is not supported.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Digest algorithm name that is not supported.
    #[error("Unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),
}

impl CacheError {
    /// Creates an I/O error bound to a path.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
