//! Cancellable polling monitor loop.
//!
//! One full scan cycle per tick: walk, fingerprint, diff against the
//! persisted baseline, log every change, persist the replacement baseline.
//! Cycles are strictly sequential; cycle *n+1* never starts before cycle
//! *n*'s baseline write completes. Cancellation is cooperative and takes
//! effect at iteration boundaries only, so an in-progress cycle always
//! runs to completion.

use parking_lot::Mutex;
use sentinel_core::baseline::BaselineStore;
use sentinel_core::error::{Result, SentinelError};
use sentinel_core::event_log::EventLog;
use sentinel_core::scanner::{Scanner, SkippedFile};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Stopped,
    Running,
}

/// Running state of the control loop, with the change counter and watched
/// roots owned by the session rather than by globals.
pub struct MonitorSession {
    scanner: Scanner,
    store: BaselineStore,
    log: Arc<EventLog>,
    state: Mutex<SessionState>,
    change_count: AtomicU64,
}

impl MonitorSession {
    pub fn new(scanner: Scanner, store: BaselineStore, log: Arc<EventLog>) -> Self {
        Self {
            scanner,
            store,
            log,
            state: Mutex::new(SessionState::Stopped),
            change_count: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Total ChangeEvents emitted over the session's lifetime.
    pub fn change_count(&self) -> u64 {
        self.change_count.load(Ordering::Relaxed)
    }

    /// Seed the first baseline: walk, fingerprint, persist. No comparison
    /// against prior state and no change events. Returns the file count.
    pub fn scan_baseline(&self) -> Result<usize> {
        self.require_roots()?;
        let (baseline, skipped) = self.scanner.snapshot();
        self.log_skipped(&skipped);
        self.store.save(&baseline)?;
        self.log.append("Initial scan completed successfully.")?;
        Ok(baseline.len())
    }

    /// One change-check cycle. Requires a pre-existing baseline and fails
    /// before touching the filesystem when there is none. Returns the
    /// number of events emitted.
    pub fn check_once(&self) -> Result<usize> {
        let old = self
            .store
            .load()?
            .ok_or_else(|| SentinelError::MissingBaseline(self.store.path().to_path_buf()))?;

        let outcome = self.scanner.diff_against(&old);
        self.log_skipped(&outcome.skipped);
        for event in &outcome.events {
            self.log.append(&event.to_string())?;
            self.change_count.fetch_add(1, Ordering::Relaxed);
        }
        // Persist last: a failed write must not pretend the baseline
        // advanced, so the next cycle diffs against the old state again.
        self.store.save(&outcome.baseline)?;
        Ok(outcome.events.len())
    }

    fn require_roots(&self) -> Result<()> {
        if self.scanner.roots().is_empty() {
            return Err(SentinelError::NoRootConfigured);
        }
        Ok(())
    }

    fn log_skipped(&self, skipped: &[SkippedFile]) {
        for skip in skipped {
            warn!(path = %skip.path.display(), reason = %skip.reason, "file skipped this cycle");
            let _ = self.log.append(&format!(
                "Skipped unreadable file: {} ({})",
                skip.path.display(),
                skip.reason
            ));
        }
    }
}

/// Handle returned to the caller so it can request a cooperative stop.
pub struct MonitorHandle {
    shutdown_tx: watch::Sender<bool>,
}

impl MonitorHandle {
    /// Request termination. Takes effect at the next loop iteration
    /// boundary, not instantaneously.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Spawn the monitor loop as a tokio task. Fails with `NoRootConfigured`
/// before transitioning to `Running` when no root is watched, and with
/// `AlreadyRunning` when the session's loop is already live — the session
/// owns the single-invocation guarantee, so two loops can never race one
/// baseline store.
pub fn spawn_monitor(
    session: Arc<MonitorSession>,
    interval: Duration,
) -> Result<(tokio::task::JoinHandle<()>, MonitorHandle)> {
    session.require_roots()?;
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    {
        let mut state = session.state.lock();
        if *state == SessionState::Running {
            return Err(SentinelError::AlreadyRunning);
        }
        session.log.append("Monitoring started.")?;
        for root in session.scanner.roots() {
            session
                .log
                .append(&format!("Watching root: {}", root.display()))?;
        }
        // Transition only once the lifecycle lines are down; a failed
        // append must not leave the session stuck in Running with no loop.
        *state = SessionState::Running;
    }
    info!(interval_secs = interval.as_secs(), "monitor loop started");

    let handle = tokio::spawn(async move {
        loop {
            match session.check_once() {
                Ok(events) => {
                    if events > 0 {
                        info!(events, "changes detected this cycle");
                    }
                }
                Err(err) => {
                    // Missing baseline and persistence failures both
                    // resolve to one log line; the cycle is retried on the
                    // next tick rather than aborting the loop.
                    warn!(error = %err, "scan cycle failed");
                    let _ = session.log.append(&err.to_string());
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
            // Check again after the sleep so a stop requested mid-interval
            // never starts another cycle.
            if *shutdown_rx.borrow() {
                break;
            }
        }

        *session.state.lock() = SessionState::Stopped;
        let _ = session.log.append("Monitoring stopped.");
        info!("monitor loop stopped");
    });

    Ok((handle, MonitorHandle { shutdown_tx }))
}
