//! Baseline persistence: the last recorded path → digest mapping.
//!
//! The baseline is the durable "last known good" state. It is replaced in
//! full after every scan cycle, never merged, so stale keys disappear with
//! the write. A crash mid-write can corrupt the store; that is an accepted
//! limitation of the single whole-file overwrite.

use crate::error::{Result, SentinelError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Mapping from absolute file path to SHA-256 hex digest. Serialized as a
/// plain JSON object sorted by path, with no metadata and no algorithm tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Baseline {
    entries: BTreeMap<String, String>,
}

impl Baseline {
    pub fn insert(&mut self, path: String, digest: String) {
        self.entries.insert(path, digest);
    }

    pub fn digest(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in sorted path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(path, digest)| (path.as_str(), digest.as_str()))
    }
}

/// Whole-file JSON persistence for the baseline.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing store file is the expected "no baseline yet" condition,
    /// not an error: an initial scan is required before change detection
    /// is meaningful.
    pub fn load(&self) -> Result<Option<Baseline>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path).map_err(|source| SentinelError::Io {
            path: self.path.clone(),
            source,
        })?;
        let baseline = serde_json::from_str(&data).map_err(|source| SentinelError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "baseline loaded");
        Ok(Some(baseline))
    }

    /// Replace the store with `baseline` in one whole-file overwrite.
    pub fn save(&self, baseline: &Baseline) -> Result<()> {
        let json =
            serde_json::to_string_pretty(baseline).map_err(|source| SentinelError::Persistence {
                path: self.path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, source),
            })?;
        fs::write(&self.path, json).map_err(|source| SentinelError::Persistence {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), entries = baseline.len(), "baseline saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_missing_store_is_none_not_error() {
        let dir = tempdir().unwrap();
        let store = BaselineStore::new(dir.path().join("baseline.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = BaselineStore::new(dir.path().join("baseline.json"));

        let mut baseline = Baseline::default();
        baseline.insert("/watched/a.txt".into(), "aa".repeat(32));
        baseline.insert("/watched/b.txt".into(), "bb".repeat(32));
        store.save(&baseline).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, baseline);
        assert_eq!(loaded.digest("/watched/a.txt"), Some("aa".repeat(32).as_str()));
    }

    #[test]
    fn persisted_form_is_a_plain_json_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        let store = BaselineStore::new(&path);

        let mut baseline = Baseline::default();
        baseline.insert("/z/last.txt".into(), "cc".repeat(32));
        baseline.insert("/a/first.txt".into(), "dd".repeat(32));
        store.save(&baseline).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let object = raw.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.values().all(|v| v.is_string()));
        // BTreeMap keeps the object sorted by path.
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, ["/a/first.txt", "/z/last.txt"]);
    }

    #[test]
    fn save_replaces_rather_than_merges() {
        let dir = tempdir().unwrap();
        let store = BaselineStore::new(dir.path().join("baseline.json"));

        let mut first = Baseline::default();
        first.insert("/watched/stale.txt".into(), "ee".repeat(32));
        store.save(&first).unwrap();

        let second = Baseline::default();
        store.save(&second).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn corrupt_store_surfaces_as_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("baseline.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = BaselineStore::new(&path);
        assert!(matches!(
            store.load(),
            Err(SentinelError::Corrupt { .. })
        ));
    }
}
