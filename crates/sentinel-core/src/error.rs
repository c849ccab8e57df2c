use std::path::PathBuf;
use thiserror::Error;

/// Failure taxonomy for the monitoring engine. Everything an operator can
/// hit resolves to one human-readable message.
#[derive(Debug, Error)]
pub enum SentinelError {
    #[error("no watch root configured; select a folder first")]
    NoRootConfigured,

    #[error("monitoring is already running")]
    AlreadyRunning,

    #[error("no baseline found at {}; run an initial scan first", .0.display())]
    MissingBaseline(PathBuf),

    #[error("failed to persist baseline to {}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("baseline store at {} is corrupt", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("i/o failure on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SentinelError>;
