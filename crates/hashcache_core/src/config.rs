//! Cache configuration.

use std::fs;
use std::path::{Path, PathBuf};

use jsonc_parser::ParseOptions;
use serde::{Deserialize, Serialize};

use crate::{CacheError, DigestAlgorithm, Encoding, FileSystem};

/// Options a [`HashCache`](crate::HashCache) is constructed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HashCacheConfig {
    /// Namespace used when the caller omits one.
    #[serde(default = "default_key")]
    pub default_key: String,

    /// File name of the persisted document.
    #[serde(default = "default_cache_file")]
    pub cache_file: String,

    /// Directory `cache_file` resolves against.
    #[serde(default = "default_root")]
    pub cache_root: PathBuf,

    /// Base directory file keys are relative to.
    #[serde(default = "default_root")]
    pub project_root: PathBuf,

    /// Default text encoding.
    #[serde(default)]
    pub encoding: Encoding,

    /// Digest algorithm.
    #[serde(default)]
    pub algorithm: DigestAlgorithm,
}

fn default_key() -> String {
    "file".to_string()
}

fn default_cache_file() -> String {
    ".hash-cache.json".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl HashCacheConfig {
    /// Config file names searched by [`discover`](Self::discover), in order.
    pub const CONFIG_FILES: &'static [&'static str] = &[".hashcache.jsonc", ".hashcache.json"];

    /// Creates a configuration with default values. Both roots are the
    /// current directory.
    pub fn new() -> Self {
        Self {
            default_key: default_key(),
            cache_file: default_cache_file(),
            cache_root: default_root(),
            project_root: default_root(),
            encoding: Encoding::default(),
            algorithm: DigestAlgorithm::default(),
        }
    }

    /// Sets the default namespace key.
    pub fn with_default_key(mut self, key: impl Into<String>) -> Self {
        self.default_key = key.into();
        self
    }

    /// Sets the cache file name.
    pub fn with_cache_file(mut self, name: impl Into<String>) -> Self {
        self.cache_file = name.into();
        self
    }

    /// Sets the cache root directory.
    pub fn with_cache_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_root = dir.into();
        self
    }

    /// Sets the project root directory.
    pub fn with_project_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_root = dir.into();
        self
    }

    /// Sets the default encoding.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the digest algorithm.
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Path of the persisted document (`cache_root` joined with `cache_file`).
    pub fn cache_path(&self) -> PathBuf {
        self.cache_root.join(&self.cache_file)
    }

    /// Loads configuration from a file.
    ///
    /// Relative roots are resolved against the directory containing the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CacheError::config(format!(
                "Failed to read config {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_json(&content)?;

        if let Some(base_dir) = path.parent() {
            config.cache_root = base_dir.join(&config.cache_root);
            config.project_root = base_dir.join(&config.project_root);
        }

        Ok(config)
    }

    /// Parses configuration from JSON text. Comments and trailing commas are
    /// accepted.
    pub fn from_json(json: &str) -> Result<Self, CacheError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| CacheError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        serde_json::from_value(value)
            .map_err(|e| CacheError::config(format!("Invalid config: {}", e)))
    }

    /// Looks for a config file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Default contents written by `hcache init`.
    pub fn template() -> String {
        r#"{
  // Namespace used when none is given on the command line.
  "defaultKey": "file",
  "cacheFile": ".hash-cache.json",
  "cacheRoot": ".",
  "projectRoot": ".",
  "encoding": "utf-8",
  // One of "sha1", "sha256", "blake3".
  "algorithm": "sha1"
}
"#
        .to_string()
    }
}

impl HashCacheConfig {
    /// Writes [`template`](Self::template) to `dir` under the first of
    /// [`CONFIG_FILES`](Self::CONFIG_FILES) and returns its path.
    ///
    /// An existing file is only replaced when `force` is set.
    pub fn write_template<F: FileSystem>(
        fs: &F,
        dir: impl AsRef<Path>,
        force: bool,
    ) -> Result<PathBuf, CacheError> {
        let path = dir.as_ref().join(Self::CONFIG_FILES[0]);
        if !force && fs.exists(&path) {
            return Err(CacheError::AlreadyExists { path });
        }

        fs.write(&path, Self::template().as_bytes())
            .map_err(|e| CacheError::io(&path, e))?;

        Ok(path)
    }
}

impl Default for HashCacheConfig {
    fn default() -> Self {
        Self::new()
    }
}
