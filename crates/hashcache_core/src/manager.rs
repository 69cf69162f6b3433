//! Hash cache manager.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use path_absolutize::Absolutize;
use tracing::{debug, info, warn};

use crate::digest::{content_digest, file_digest};
use crate::fs::{FileSystem, OsFileSystem};
use crate::{CacheDocument, CacheError, DigestAlgorithm, Encoding, HashCacheConfig};

/// Persistent map of content digests, partitioned by namespace.
///
/// The cache is driven by a single owner: methods take `&mut self` and no
/// internal synchronization is performed. Wrap it in a mutex to share it.
///
/// Lifecycle: [`load`](Self::load), any number of
/// [`update_entry`](Self::update_entry) / [`file_has_changed`](Self::file_has_changed) /
/// [`compare_files`](Self::compare_files) / [`prune_entries`](Self::prune_entries),
/// then [`save`](Self::save). Nothing is written to disk except by `save`.
///
/// Namespaces are loaded lazily: `update_entry` and `file_has_changed` call
/// `load` for a namespace that is not yet present. The cache file is read at
/// most once per instance; after that, and after [`clear`](Self::clear) or
/// [`remove_namespace`](Self::remove_namespace), the in-memory document is
/// authoritative.
pub struct HashCache<F: FileSystem = OsFileSystem> {
    /// Location of the persisted document.
    cache_path: PathBuf,
    /// Absolute base directory for file keys.
    project_root: PathBuf,
    default_key: String,
    default_encoding: Encoding,
    algorithm: DigestAlgorithm,
    document: CacheDocument,
    /// Set once the cache file has been consulted or the document was
    /// emptied on purpose.
    loaded: bool,
    fs: F,
}

impl HashCache<OsFileSystem> {
    /// Creates a cache backed by the real filesystem.
    pub fn new(config: HashCacheConfig) -> Result<Self, CacheError> {
        Self::with_fs(config, OsFileSystem)
    }
}

impl<F: FileSystem> HashCache<F> {
    /// Creates a cache backed by `fs`.
    ///
    /// Relative roots are resolved against the current directory. The
    /// document starts empty; call [`load`](Self::load) to read it.
    pub fn with_fs(config: HashCacheConfig, fs: F) -> Result<Self, CacheError> {
        let cache_path = absolutize(&config.cache_path())?;
        let project_root = absolutize(&config.project_root)?;

        debug!(
            "Hash cache at {} for project {}",
            cache_path.display(),
            project_root.display()
        );

        Ok(Self {
            cache_path,
            project_root,
            default_key: config.default_key,
            default_encoding: config.encoding,
            algorithm: config.algorithm,
            document: CacheDocument::new(),
            loaded: false,
            fs,
        })
    }

    /// Path of the persisted document.
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Base directory file keys are relative to.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Namespace used when none is given.
    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    /// The in-memory document.
    pub fn document(&self) -> &CacheDocument {
        &self.document
    }

    /// Loads the cache from disk.
    ///
    /// The file is read only on the first call, and only while the in-memory
    /// document is empty. A cache file that is empty or not valid JSON yields
    /// an empty document. When
    /// `prune` is set, dangling entries are removed after reading. When
    /// `namespace` is given, it is created if absent.
    ///
    /// Keys are kept in alphabetical order at all times, so there is no
    /// separate sorting step.
    pub fn load(&mut self, namespace: Option<&str>, prune: bool) -> Result<(), CacheError> {
        if !self.loaded && self.document.is_empty() && self.fs.exists(&self.cache_path) {
            let content = self
                .fs
                .read_text(&self.cache_path, Encoding::Utf8)?;

            self.document = match CacheDocument::from_json(&content) {
                Some(document) => document,
                None => {
                    warn!(
                        "Ignoring unreadable cache file {}",
                        self.cache_path.display()
                    );
                    CacheDocument::new()
                }
            };

            info!(
                "Loaded {} cache entries from {}",
                self.document.len(),
                self.cache_path.display()
            );

            if prune {
                self.prune_entries();
            }
        }
        self.loaded = true;

        if let Some(namespace) = namespace {
            self.document.namespace_mut(namespace);
        }

        Ok(())
    }

    /// Saves the cache to disk, optionally pruning dangling entries first.
    pub fn save(&mut self, prune: bool) -> Result<(), CacheError> {
        if prune {
            self.prune_entries();
        }

        let json = self
            .document
            .to_json()
            .map_err(|e| CacheError::Serialization(e.to_string()))?;

        self.fs
            .write(&self.cache_path, json.as_bytes())
            .map_err(|e| CacheError::io(&self.cache_path, e))?;

        info!(
            "Saved {} cache entries to {}",
            self.document.len(),
            self.cache_path.display()
        );

        Ok(())
    }

    /// Records the current digest of `filepath`.
    ///
    /// Returns `false` without touching the cache if the path is empty or
    /// does not exist. Uses the default namespace and encoding when `None`.
    pub fn update_entry(
        &mut self,
        filepath: impl AsRef<Path>,
        namespace: Option<&str>,
        encoding: Option<Encoding>,
    ) -> Result<bool, CacheError> {
        let filepath = filepath.as_ref();
        if filepath.as_os_str().is_empty() || !self.fs.exists(filepath) {
            return Ok(false);
        }

        let encoding = encoding.unwrap_or(self.default_encoding);
        let file_key = self.file_key(filepath)?;
        let digest = file_digest(&self.fs, filepath, encoding, self.algorithm)?;

        let namespace = namespace.unwrap_or(&self.default_key).to_string();
        if !self.document.contains_namespace(&namespace) {
            self.load(Some(namespace.as_str()), false)?;
        }

        debug!("Updated {} in {}", file_key, namespace);
        self.document.insert(&namespace, file_key, digest);

        Ok(true)
    }

    /// Returns whether `filepath` differs from its recorded digest.
    ///
    /// This check is not read-only: when the digests differ, the fresh
    /// digest is stored. A file never recorded counts as changed unless it
    /// is empty or missing, whose digest is the empty string.
    ///
    /// The digest covers the decoded text, not the raw bytes. With the
    /// lossy [`Encoding::Utf8`] decoder, edits that only swap one invalid
    /// byte sequence for another go unnoticed; use [`Encoding::Latin1`] or
    /// [`Encoding::Hex`] for binary content.
    pub fn file_has_changed(
        &mut self,
        filepath: impl AsRef<Path>,
        namespace: Option<&str>,
        encoding: Option<Encoding>,
    ) -> Result<bool, CacheError> {
        let filepath = filepath.as_ref();
        let namespace = namespace.unwrap_or(&self.default_key).to_string();
        if !self.document.contains_namespace(&namespace) {
            self.load(Some(namespace.as_str()), false)?;
        }

        let (file_key, digest, changed) = self.check(filepath, &namespace, encoding)?;

        if changed {
            debug!("{} changed in {}", file_key, namespace);
            self.document.insert(&namespace, file_key, digest);
        }

        Ok(changed)
    }

    /// Like [`file_has_changed`](Self::file_has_changed), but never updates
    /// the cache and never loads from disk.
    pub fn peek_changed(
        &self,
        filepath: impl AsRef<Path>,
        namespace: Option<&str>,
        encoding: Option<Encoding>,
    ) -> Result<bool, CacheError> {
        let namespace = namespace.unwrap_or(&self.default_key);
        let (_, _, changed) = self.check(filepath.as_ref(), namespace, encoding)?;
        Ok(changed)
    }

    /// Compares two files by digest without touching the cache.
    ///
    /// Returns `false` if either path is empty or missing. Like
    /// [`file_has_changed`](Self::file_has_changed), this compares decoded
    /// text: under [`Encoding::Utf8`], files differing only in invalid
    /// UTF-8 bytes compare equal.
    pub fn compare_files(
        &self,
        first: impl AsRef<Path>,
        second: impl AsRef<Path>,
        encoding: Option<Encoding>,
    ) -> Result<bool, CacheError> {
        let (first, second) = (first.as_ref(), second.as_ref());
        if [first, second]
            .iter()
            .any(|path| path.as_os_str().is_empty() || !self.fs.exists(path))
        {
            return Ok(false);
        }

        let encoding = encoding.unwrap_or(self.default_encoding);
        let first_content = self.fs.read_text(first, encoding)?;
        let second_content = self.fs.read_text(second, encoding)?;

        Ok(content_digest(&first_content, self.algorithm)
            == content_digest(&second_content, self.algorithm))
    }

    /// Removes entries whose file no longer exists under the project root,
    /// in every namespace. Returns the number of removed entries.
    ///
    /// Only the in-memory document changes; call [`save`](Self::save) to
    /// persist.
    pub fn prune_entries(&mut self) -> usize {
        let (fs, root) = (&self.fs, &self.project_root);
        let removed = self
            .document
            .retain_files(|file_key| fs.exists(&root.join(file_key)));

        if removed > 0 {
            info!("Pruned {} stale cache entries", removed);
        }

        removed
    }

    /// Drops the entry for `filepath`. Returns whether one existed.
    pub fn remove_entry(
        &mut self,
        filepath: impl AsRef<Path>,
        namespace: Option<&str>,
    ) -> Result<bool, CacheError> {
        let file_key = self.file_key(filepath.as_ref())?;
        let namespace = namespace.unwrap_or(&self.default_key);
        Ok(self.document.remove(namespace, &file_key).is_some())
    }

    /// Drops a whole namespace. Returns whether it existed.
    ///
    /// The namespace is not read back from the cache file by a later lazy
    /// load.
    pub fn remove_namespace(&mut self, namespace: &str) -> bool {
        self.loaded = true;
        self.document.remove_namespace(namespace).is_some()
    }

    /// Empties the in-memory document. Nothing is read back from the cache
    /// file afterwards; [`save`](Self::save) persists the empty document.
    pub fn clear(&mut self) {
        self.loaded = true;
        self.document.clear();
    }

    /// Key of `filepath` relative to the project root.
    ///
    /// Fails with [`CacheError::NoRelativePath`] when the file sits on a
    /// different drive or UNC share than the root, since such a key could
    /// only be absolute.
    pub fn file_key(&self, filepath: &Path) -> Result<String, CacheError> {
        let absolute = absolutize(filepath)?;
        let relative = relative_path(&self.project_root, &absolute).ok_or_else(|| {
            CacheError::NoRelativePath {
                path: absolute.clone(),
            }
        })?;
        Ok(relative.to_string_lossy().into_owned())
    }

    fn check(
        &self,
        filepath: &Path,
        namespace: &str,
        encoding: Option<Encoding>,
    ) -> Result<(String, String, bool), CacheError> {
        let encoding = encoding.unwrap_or(self.default_encoding);
        let file_key = self.file_key(filepath)?;
        let digest = file_digest(&self.fs, filepath, encoding, self.algorithm)?;
        let cached = self.document.get(namespace, &file_key).unwrap_or("");
        let changed = digest != cached;

        Ok((file_key, digest, changed))
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, CacheError> {
    path.absolutize()
        .map(Cow::into_owned)
        .map_err(|e| CacheError::io(path, e))
}

/// Lexical path from `base` to `target`. Both must be absolute and
/// normalized. Returns an empty path when they are equal, and `None` when
/// they do not share a root (different Windows drives).
fn relative_path(base: &Path, target: &Path) -> Option<PathBuf> {
    let base: Vec<Component<'_>> = base.components().collect();
    let target: Vec<Component<'_>> = target.components().collect();

    let common = base
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        match component {
            Component::Prefix(_) | Component::RootDir => return None,
            _ => relative.push(component.as_os_str()),
        }
    }
    Some(relative)
}
