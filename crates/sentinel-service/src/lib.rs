//! Sentinel service: the polling monitor loop over the core engine.

pub mod monitor;
