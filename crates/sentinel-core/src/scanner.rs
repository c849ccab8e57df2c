//! Scan and diff engine: walk, fingerprint, classify changes.
//!
//! One cycle walks every watched root, fingerprints each file, and
//! classifies every path against the previous baseline. Files that cannot
//! be fingerprinted are returned as explicit [`SkippedFile`] records rather
//! than silently dropped, so the caller chooses the logging granularity.
//! A skipped path is neither reported as changed nor carried into the new
//! baseline for that cycle.

use crate::baseline::Baseline;
use crate::fingerprint::fingerprint;
use crate::walker::{walk, IgnoreSet};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// One detected change for a single path. Produced transiently per scan
/// cycle; rendered into the activity log, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Added(PathBuf),
    Modified(PathBuf),
    Deleted(PathBuf),
}

impl ChangeEvent {
    pub fn path(&self) -> &PathBuf {
        match self {
            ChangeEvent::Added(p) | ChangeEvent::Modified(p) | ChangeEvent::Deleted(p) => p,
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeEvent::Added(p) => write!(f, "New file detected: {}", p.display()),
            ChangeEvent::Modified(p) => write!(f, "File modified: {}", p.display()),
            ChangeEvent::Deleted(p) => write!(f, "File deleted: {}", p.display()),
        }
    }
}

/// A file that could not be fingerprinted this cycle.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of one change-check cycle. `baseline` fully replaces the old
/// one; callers must persist it as a replacement, not a merge.
#[derive(Debug)]
pub struct ScanOutcome {
    pub events: Vec<ChangeEvent>,
    pub baseline: Baseline,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Clone)]
pub struct Scanner {
    roots: Vec<PathBuf>,
    ignore: IgnoreSet,
}

impl Scanner {
    pub fn new(roots: Vec<PathBuf>, ignore: IgnoreSet) -> Self {
        Self { roots, ignore }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Walk and fingerprint everything with no comparison and no events.
    /// Seeds the first baseline.
    pub fn snapshot(&self) -> (Baseline, Vec<SkippedFile>) {
        let mut baseline = Baseline::default();
        let mut skipped = Vec::new();
        for path in walk(&self.roots, &self.ignore) {
            match fingerprint(&path) {
                Ok(digest) => baseline.insert(path.display().to_string(), digest),
                Err(err) => skipped.push(SkippedFile {
                    path,
                    reason: err.to_string(),
                }),
            }
        }
        debug!(files = baseline.len(), skipped = skipped.len(), "snapshot complete");
        (baseline, skipped)
    }

    /// One diff cycle against `old`.
    ///
    /// Added/Modified events follow the walk's enumeration order; Deleted
    /// events follow the old baseline's iteration order (sorted by path).
    pub fn diff_against(&self, old: &Baseline) -> ScanOutcome {
        let mut events = Vec::new();
        let mut baseline = Baseline::default();
        let mut skipped = Vec::new();

        for path in walk(&self.roots, &self.ignore) {
            let key = path.display().to_string();
            let digest = match fingerprint(&path) {
                Ok(digest) => digest,
                Err(err) => {
                    skipped.push(SkippedFile {
                        path,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            match old.digest(&key) {
                None => events.push(ChangeEvent::Added(path)),
                Some(previous) if previous != digest => events.push(ChangeEvent::Modified(path)),
                Some(_) => {}
            }
            baseline.insert(key, digest);
        }

        for (path, _) in old.iter() {
            if !baseline.contains(path) {
                events.push(ChangeEvent::Deleted(PathBuf::from(path)));
            }
        }

        debug!(
            events = events.len(),
            files = baseline.len(),
            skipped = skipped.len(),
            "scan cycle complete"
        );
        ScanOutcome {
            events,
            baseline,
            skipped,
        }
    }
}
