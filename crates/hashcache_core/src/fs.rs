//! Filesystem access used by the cache.
//!
//! This module provides the `FileSystem` trait which abstracts the three
//! primitives the cache needs, so the cache logic can run against something
//! other than the real disk (for example in tests that simulate write
//! failures).

use std::fs;
use std::io;
use std::path::Path;

use crate::{CacheError, Encoding};

/// Filesystem primitives required by [`HashCache`](crate::HashCache).
pub trait FileSystem {
    /// Returns whether a file exists at `path`. Never fails.
    fn exists(&self, path: &Path) -> bool;

    /// Reads the whole file as bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Writes `contents` to `path`, replacing any previous contents.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Reads a file and decodes it with `encoding`.
    fn read_text(&self, path: &Path, encoding: Encoding) -> Result<String, CacheError> {
        let bytes = self.read(path).map_err(|e| CacheError::io(path, e))?;
        Ok(encoding.decode(&bytes))
    }
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_exists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        assert!(!OsFileSystem.exists(&path));

        fs::write(&path, "a").unwrap();
        assert!(OsFileSystem.exists(&path));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/cache.json");

        OsFileSystem.write(&path, b"{}\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[test]
    fn test_read_text_decodes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.bin");
        fs::write(&path, [0xde, 0xad]).unwrap();

        assert_eq!(OsFileSystem.read_text(&path, Encoding::Hex).unwrap(), "dead");
    }

    #[test]
    fn test_read_text_reports_path_on_error() {
        let dir = tempdir().unwrap();
        // A directory exists but cannot be read as a file.
        let err = OsFileSystem
            .read_text(dir.path(), Encoding::Utf8)
            .unwrap_err();

        match err {
            CacheError::Io { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }
}
