//! Poll scheduler and sync phase state machine
//!
//! The [`Scheduler`] owns the only mutable state of the daemon: the
//! [`SyncPhase`]. It drives one reconciliation pass per interval tick and
//! performs the one-shot `FirstSync` → `Steady` transition after the first
//! pass that actually executed.
//!
//! ## Flow
//!
//! ```text
//! interval tick ──→ scan local dir ──→ fetch + adapt remote listing
//!                                             │
//!                     Reconciler ←────────────┘
//!                         │
//!                   advance phase (once)
//! ```
//!
//! The loop runs until its [`CancellationToken`] fires, so an embedding
//! host can stop it without killing the process; [`Scheduler::tick`] is
//! public so tests and one-shot invocations can single-step iterations
//! instead of waiting on wall-clock sleeps.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use yamirror_core::ports::remote_storage::RemoteStorage;

use crate::reconciler::{ReconcileOutcome, Reconciler};
use crate::{remote, scanner};

// ============================================================================
// SyncPhase
// ============================================================================

/// Phase of the mirror state machine
///
/// Starts in `FirstSync`; after exactly one executed pass the scheduler
/// moves to `Steady` and never returns, for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Initial pass: upload-only, never deletes or overwrites
    FirstSync,
    /// Full upload/overwrite/delete mirroring
    Steady,
}

// ============================================================================
// Scheduler
// ============================================================================

/// Drives reconciliation passes at a fixed interval
pub struct Scheduler {
    /// Remote side of the mirror (shared with the reconciler)
    storage: Arc<dyn RemoteStorage>,
    /// Applies diff plans
    reconciler: Reconciler,
    /// Directory being mirrored
    local_dir: PathBuf,
    /// Sleep between passes
    poll_interval: Duration,
    /// Current state machine phase
    phase: SyncPhase,
    /// Stops the loop when cancelled
    shutdown: CancellationToken,
}

impl Scheduler {
    /// Create a scheduler in the `FirstSync` phase.
    pub fn new(
        storage: Arc<dyn RemoteStorage>,
        local_dir: PathBuf,
        poll_interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        let reconciler = Reconciler::new(storage.clone(), local_dir.clone());
        Self {
            storage,
            reconciler,
            local_dir,
            poll_interval,
            phase: SyncPhase::FirstSync,
            shutdown,
        }
    }

    /// Current state machine phase
    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Execute one reconciliation pass.
    ///
    /// Returns `None` when the pass could not execute (local scan failed,
    /// or the remote listing was rejected as malformed); a skipped pass
    /// does not advance the phase. A listing *fetch* failure is not a
    /// skip: the remote is treated as empty and the pass proceeds, which
    /// in steady state means "delete nothing, upload what looks missing"
    /// and self-heals once the listing returns.
    pub async fn tick(&mut self) -> Option<ReconcileOutcome> {
        let local = match scanner::build_manifest(&self.local_dir).await {
            Ok(manifest) => manifest,
            Err(err) => {
                error!(error = %err, "Local scan failed, skipping this pass");
                return None;
            }
        };

        let listing = match self.storage.list().await {
            Ok(listing) => listing,
            Err(err) => {
                warn!(error = %err, "Remote listing unavailable, treating remote as empty");
                None
            }
        };

        let remote = match remote::to_manifest(listing) {
            Ok(manifest) => manifest,
            Err(err) => {
                error!(error = %err, "Remote listing rejected, skipping this pass");
                return None;
            }
        };

        let first_sync = self.phase == SyncPhase::FirstSync;
        let outcome = self
            .reconciler
            .reconcile(&local, &remote, first_sync)
            .await;

        info!(
            local_files = local.len(),
            remote_files = remote.len(),
            uploaded = outcome.uploaded,
            overwritten = outcome.overwritten,
            deleted = outcome.deleted,
            failed = outcome.failed,
            duration_ms = outcome.duration_ms,
            phase = ?self.phase,
            "Reconciliation pass completed"
        );

        // One-shot transition, even when the pass had nothing to upload.
        if first_sync {
            self.phase = SyncPhase::Steady;
            info!("Initial upload pass done, switching to full mirroring");
        }

        Some(outcome)
    }

    /// Run passes until the cancellation token fires.
    ///
    /// The first pass starts immediately; iterations are fully serialized,
    /// so a pass always finishes applying before the next one scans.
    pub async fn run(&mut self) {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            local_dir = %self.local_dir.display(),
            "Starting mirror loop"
        );

        let mut interval = tokio::time::interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick().await;
                }
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown signal received, stopping mirror loop");
                    break;
                }
            }
        }

        info!("Mirror loop terminated");
    }
}

// ============================================================================
// Unit tests
// ============================================================================
