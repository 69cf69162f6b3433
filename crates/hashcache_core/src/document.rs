//! The cache document: namespace key → (file key → digest).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Digests of the files tracked in one namespace, keyed by file key.
pub type EntrySet = BTreeMap<String, String>;

/// In-memory form of the persisted cache file.
///
/// Both levels are ordered maps, so namespace keys and file keys are always
/// in alphabetical (byte-wise) order and serialize that way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheDocument {
    namespaces: BTreeMap<String, EntrySet>,
}

impl CacheDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a document from JSON text.
    ///
    /// Returns `None` if the text is empty, malformed, or not shaped like a
    /// cache document.
    pub fn from_json(content: &str) -> Option<Self> {
        serde_json::from_str(content).ok()
    }

    /// Serializes the document as two-space indented JSON with a trailing
    /// newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Returns true if the document has no namespaces.
    ///
    /// A document holding only empty namespaces is not empty.
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// Total number of entries across all namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.values().map(BTreeMap::len).sum()
    }

    /// Returns true if `namespace` exists.
    pub fn contains_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// Returns the entry set of `namespace`, creating it if absent.
    pub fn namespace_mut(&mut self, namespace: &str) -> &mut EntrySet {
        self.namespaces.entry(namespace.to_string()).or_default()
    }

    /// Returns the entry set of `namespace`, if present.
    pub fn entries(&self, namespace: &str) -> Option<&EntrySet> {
        self.namespaces.get(namespace)
    }

    /// Iterates namespace keys in order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    /// Stored digest for `file_key` in `namespace`.
    pub fn get(&self, namespace: &str, file_key: &str) -> Option<&str> {
        self.namespaces
            .get(namespace)
            .and_then(|entries| entries.get(file_key))
            .map(String::as_str)
    }

    /// Stores `digest` for `file_key`, creating the namespace if needed.
    /// Returns the previous digest.
    pub fn insert(&mut self, namespace: &str, file_key: String, digest: String) -> Option<String> {
        self.namespace_mut(namespace).insert(file_key, digest)
    }

    /// Removes one entry. Returns the removed digest.
    pub fn remove(&mut self, namespace: &str, file_key: &str) -> Option<String> {
        self.namespaces
            .get_mut(namespace)
            .and_then(|entries| entries.remove(file_key))
    }

    /// Removes a whole namespace.
    pub fn remove_namespace(&mut self, namespace: &str) -> Option<EntrySet> {
        self.namespaces.remove(namespace)
    }

    /// Keeps only the entries for which `keep(file_key)` returns true, in
    /// every namespace. Returns the number of removed entries.
    ///
    /// Namespaces left empty are kept.
    pub fn retain_files(&mut self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let before = self.len();
        for entries in self.namespaces.values_mut() {
            entries.retain(|file_key, _| keep(file_key.as_str()));
        }
        before - self.len()
    }

    /// Removes every namespace.
    pub fn clear(&mut self) {
        self.namespaces.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> CacheDocument {
        let mut doc = CacheDocument::new();
        doc.insert("styles", "b.css".to_string(), "BBB=".to_string());
        doc.insert("styles", "a.css".to_string(), "AAA=".to_string());
        doc.insert("docs", "readme.md".to_string(), "RRR=".to_string());
        doc
    }

    #[test]
    fn test_new_document_is_empty() {
        let doc = CacheDocument::new();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
        assert_eq!(doc.to_json().unwrap(), "{}\n");
    }

    #[test]
    fn test_empty_namespace_makes_document_non_empty() {
        let mut doc = CacheDocument::new();
        doc.namespace_mut("file");

        assert!(!doc.is_empty());
        assert_eq!(doc.len(), 0);
        assert_eq!(doc.entries("file"), Some(&EntrySet::new()));
    }

    #[test]
    fn test_json_is_sorted_and_indented() {
        let json = sample().to_json().unwrap();
        assert_eq!(
            json,
            r#"{
  "docs": {
    "readme.md": "RRR="
  },
  "styles": {
    "a.css": "AAA=",
    "b.css": "BBB="
  }
}
"#
        );
    }

    #[test]
    fn test_from_json_round_trip() {
        let doc = sample();
        let parsed = CacheDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(CacheDocument::from_json("").is_none());
        assert!(CacheDocument::from_json("{ not json").is_none());
        assert!(CacheDocument::from_json("[1, 2, 3]").is_none());
        assert!(CacheDocument::from_json(r#"{"file": {"a.txt": 42}}"#).is_none());
    }

    #[test]
    fn test_insert_get_remove() {
        let mut doc = sample();
        assert_eq!(doc.get("styles", "a.css"), Some("AAA="));
        assert_eq!(doc.get("styles", "missing.css"), None);
        assert_eq!(doc.get("missing", "a.css"), None);

        let previous = doc.insert("styles", "a.css".to_string(), "NEW=".to_string());
        assert_eq!(previous.as_deref(), Some("AAA="));

        assert_eq!(doc.remove("styles", "a.css").as_deref(), Some("NEW="));
        assert_eq!(doc.remove("styles", "a.css"), None);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_namespaces_are_ordered() {
        let doc = sample();
        let names: Vec<&str> = doc.namespaces().collect();
        assert_eq!(names, vec!["docs", "styles"]);
    }

    #[test]
    fn test_retain_files_across_namespaces() {
        let mut doc = sample();
        let removed = doc.retain_files(|key| key.ends_with(".css"));

        assert_eq!(removed, 1);
        assert!(doc.contains_namespace("docs"));
        assert_eq!(doc.entries("docs").map(BTreeMap::len), Some(0));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_remove_namespace_and_clear() {
        let mut doc = sample();
        assert!(doc.remove_namespace("docs").is_some());
        assert!(!doc.contains_namespace("docs"));

        doc.clear();
        assert!(doc.is_empty());
    }
}
