//! Recursive tree walk with base-filename ignore filtering.
//!
//! Directories are traversed but never yielded. Traversal errors on
//! individual entries (permission problems, vanished subtrees) are logged
//! and skipped so one bad directory cannot abort the whole walk. Symlinks
//! are not followed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Filenames excluded from every scan, matched on base name regardless of
/// directory depth. Covers the tool's own baseline and log files so the
/// monitor never treats its own bookkeeping as monitored content.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    names: HashSet<String>,
}

impl IgnoreSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| self.names.contains(name))
            .unwrap_or(false)
    }
}

/// Enumerate every regular file under each root, in one finite pass,
/// skipping ignored names.
pub fn walk<'a>(
    roots: &'a [PathBuf],
    ignore: &'a IgnoreSet,
) -> impl Iterator<Item = PathBuf> + 'a {
    roots.iter().flat_map(move |root| {
        WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    let path = entry.into_path();
                    if ignore.matches(&path) {
                        None
                    } else {
                        Some(path)
                    }
                }
                Ok(_) => None,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry during walk");
                    None
                }
            })
    })
}
