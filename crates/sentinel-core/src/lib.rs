//! Core engine for the Sentinel file-integrity monitor.
//!
//! The engine takes a baseline snapshot of SHA-256 content fingerprints for
//! every file under a set of watched roots, then on each scan cycle rescans
//! and classifies every path as added, modified, deleted, or unchanged.
//! Presentation is out of scope: the engine's only outward surface is the
//! append-only activity log and its observer callback.

pub mod baseline;
pub mod config;
pub mod error;
pub mod event_log;
pub mod fingerprint;
pub mod paths;
pub mod scanner;
pub mod walker;
