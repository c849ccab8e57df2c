//! Monitor configuration.
//!
//! Everything the engine consumes from the outside: watched roots, the
//! ignore set, the poll interval, and the baseline/log locations. Loaded
//! from an optional JSON file; a missing file yields the defaults.

use crate::paths;
use crate::walker::IgnoreSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const BASELINE_FILE: &str = "baseline.json";
pub const LOG_FILE: &str = "monitor.log";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Watched root directories, in scan order.
    #[serde(default)]
    pub roots: Vec<PathBuf>,
    /// Base filenames excluded from every scan.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
    #[serde(default = "default_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_baseline_path")]
    pub baseline_path: PathBuf,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            ignore: default_ignore(),
            poll_interval_secs: default_interval(),
            baseline_path: default_baseline_path(),
            log_path: default_log_path(),
        }
    }
}

impl MonitorConfig {
    /// Load from a JSON file; a missing file is the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn ignore_set(&self) -> IgnoreSet {
        IgnoreSet::new(self.ignore.iter().cloned())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn default_ignore() -> Vec<String> {
    vec![BASELINE_FILE.to_string(), LOG_FILE.to_string()]
}

fn default_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_baseline_path() -> PathBuf {
    paths::data_dir()
        .map(|dir| dir.join(BASELINE_FILE))
        .unwrap_or_else(|_| PathBuf::from(BASELINE_FILE))
}

fn default_log_path() -> PathBuf {
    paths::log_dir()
        .map(|dir| dir.join(LOG_FILE))
        .unwrap_or_else(|_| PathBuf::from(LOG_FILE))
}
