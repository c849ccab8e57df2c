//! Append-only activity log with observer forwarding.
//!
//! Every lifecycle transition and change event becomes one timestamped
//! line, appended to a durable log file and forwarded, in emission order,
//! to an optional observer callback. The observer stands in for whatever
//! display shell is attached; it is called from whichever thread appends
//! and must handle its own synchronization.

use crate::error::{Result, SentinelError};
use chrono::Local;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub type Observer = Arc<dyn Fn(&str) + Send + Sync>;

pub struct EventLog {
    path: PathBuf,
    observer: Option<Observer>,
    write_lock: Mutex<()>,
}

impl EventLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            observer: None,
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_observer(mut self, observer: Observer) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line and forward it to the observer.
    pub fn append(&self, message: &str) -> Result<()> {
        let line = format!(
            "[{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
            message
        );
        {
            let _guard = self.write_lock.lock();
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(|source| self.io_error(source))?;
            writeln!(file, "{line}").map_err(|source| self.io_error(source))?;
            file.flush().map_err(|source| self.io_error(source))?;
        }
        if let Some(observer) = &self.observer {
            observer(&line);
        }
        Ok(())
    }

    /// Most recent lines first, up to `limit`.
    pub fn read_recent(&self, limit: Option<usize>) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path).map_err(|source| self.io_error(source))?;
        let reader = BufReader::new(file);
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|source| self.io_error(source))?;
            if line.trim().is_empty() {
                continue;
            }
            lines.push(line);
        }
        lines.reverse();
        if let Some(limit) = limit {
            lines.truncate(limit);
        }
        Ok(lines)
    }

    fn io_error(&self, source: std::io::Error) -> SentinelError {
        SentinelError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
