//! Content and file digests.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::fs::FileSystem;
use crate::{CacheError, Encoding};

/// One-way hash function used to fingerprint content.
///
/// Digests are only compared with each other, so the algorithm is not a
/// security boundary. Switching algorithms makes every stored entry look
/// changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DigestAlgorithm {
    /// SHA-1 (160 bit). Matches the format of existing cache files.
    #[default]
    Sha1,
    /// SHA-256.
    Sha256,
    /// BLAKE3 (256 bit output).
    Blake3,
}

impl DigestAlgorithm {
    /// Canonical name of the algorithm.
    pub fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Blake3 => "blake3",
        }
    }

    /// Hashes `bytes` and returns the raw digest.
    pub fn digest(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha1 => Sha1::digest(bytes).to_vec(),
            DigestAlgorithm::Sha256 => Sha256::digest(bytes).to_vec(),
            DigestAlgorithm::Blake3 => blake3::hash(bytes).as_bytes().to_vec(),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            "blake3" => Ok(DigestAlgorithm::Blake3),
            _ => Err(CacheError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<String> for DigestAlgorithm {
    type Error = CacheError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DigestAlgorithm> for String {
    fn from(value: DigestAlgorithm) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Base64 digest of text content. Empty content yields an empty string.
pub(crate) fn content_digest(content: &str, algorithm: DigestAlgorithm) -> String {
    if content.is_empty() {
        return String::new();
    }

    STANDARD.encode(algorithm.digest(content.as_bytes()))
}

/// Base64 digest of a file's decoded contents.
///
/// An empty or missing path, or an empty file, yields an empty string.
pub(crate) fn file_digest<F: FileSystem>(
    fs: &F,
    path: &Path,
    encoding: Encoding,
    algorithm: DigestAlgorithm,
) -> Result<String, CacheError> {
    if path.as_os_str().is_empty() || !fs.exists(path) {
        return Ok(String::new());
    }

    let content = fs.read_text(path, encoding)?;
    Ok(content_digest(&content, algorithm))
}
