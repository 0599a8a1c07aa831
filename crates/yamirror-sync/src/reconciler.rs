//! Manifest reconciliation
//!
//! The heart of the mirror: [`diff`] compares a local and a remote manifest
//! snapshot and derives the minimal operation sets, and [`Reconciler`]
//! drives the [`RemoteStorage`] port to apply them.
//!
//! ## First sync vs steady state
//!
//! The very first pass of a process only uploads files missing remotely.
//! The remote side may hold authoritative files from a prior run or another
//! client, and deleting or overwriting them before the two sides have been
//! reconciled once would be destructive. Every later pass applies the full
//! upload/overwrite/delete diff.
//!
//! ## Application
//!
//! Operations are applied sequentially, one network round-trip each, in the
//! order uploads, overwrites, deletes. The three sets touch disjoint names,
//! so the order carries no semantics beyond deterministic logs. Results are
//! counted but never fed back into the plan: a failed call leaves the
//! local/remote discrepancy in place, and the next pass re-derives and
//! retries it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use yamirror_core::domain::FileManifest;
use yamirror_core::ports::remote_storage::RemoteStorage;

// ============================================================================
// Diff
// ============================================================================

/// Operation sets derived from one pair of manifest snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffPlan {
    /// Present locally, absent remotely
    pub uploads: Vec<String>,
    /// Present on both sides with differing digests
    pub updates: Vec<String>,
    /// Present remotely, absent locally
    pub deletes: Vec<String>,
}

impl DiffPlan {
    /// Total number of operations in the plan
    #[must_use]
    pub fn len(&self) -> usize {
        self.uploads.len() + self.updates.len() + self.deletes.len()
    }

    /// Whether the plan contains no operations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compare two manifest snapshots and derive the operations that would make
/// the remote side match the local one.
///
/// With `first_sync` set, only the upload set is populated: files already
/// present remotely are left untouched no matter what the remote manifest
/// contains.
#[must_use]
pub fn diff(local: &FileManifest, remote: &FileManifest, first_sync: bool) -> DiffPlan {
    let uploads: Vec<String> = local
        .names()
        .filter(|&name| !remote.contains(name))
        .map(str::to_string)
        .collect();

    if first_sync {
        return DiffPlan {
            uploads,
            ..DiffPlan::default()
        };
    }

    let updates: Vec<String> = local
        .iter()
        .filter(|&(name, digest)| remote.get(name).is_some_and(|theirs| theirs != digest))
        .map(|(name, _)| name.to_string())
        .collect();

    let deletes: Vec<String> = remote
        .names()
        .filter(|&name| !local.contains(name))
        .map(str::to_string)
        .collect();

    DiffPlan {
        uploads,
        updates,
        deletes,
    }
}

// ============================================================================
// Reconciler
// ============================================================================

/// Summary of one applied reconciliation pass
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    /// New files stored remotely
    pub uploaded: u32,
    /// Remote files replaced with changed local content
    pub overwritten: u32,
    /// Remote files removed
    pub deleted: u32,
    /// Operations the port reported as failed
    pub failed: u32,
    /// Wall-clock duration of the apply phase in milliseconds
    pub duration_ms: u64,
}

/// Applies diff plans against the remote storage port
pub struct Reconciler {
    /// Remote side of the mirror
    storage: Arc<dyn RemoteStorage>,
    /// Directory the uploaded files are read from
    local_dir: PathBuf,
}

impl Reconciler {
    /// Create a reconciler for `local_dir` backed by `storage`.
    pub fn new(storage: Arc<dyn RemoteStorage>, local_dir: PathBuf) -> Self {
        Self { storage, local_dir }
    }

    /// Derive and apply the operations for one pair of manifest snapshots.
    ///
    /// The snapshots are not revisited once application starts, even when
    /// individual port calls fail.
    pub async fn reconcile(
        &self,
        local: &FileManifest,
        remote: &FileManifest,
        first_sync: bool,
    ) -> ReconcileOutcome {
        let started = Instant::now();
        let plan = diff(local, remote, first_sync);

        debug!(
            uploads = plan.uploads.len(),
            updates = plan.updates.len(),
            deletes = plan.deletes.len(),
            first_sync,
            "Derived reconciliation plan"
        );

        let mut outcome = ReconcileOutcome::default();

        for name in &plan.uploads {
            if self.storage.upload(&self.local_dir, name).await {
                outcome.uploaded += 1;
            } else {
                outcome.failed += 1;
            }
        }

        for name in &plan.updates {
            if self.storage.overwrite(&self.local_dir, name).await {
                outcome.overwritten += 1;
            } else {
                outcome.failed += 1;
            }
        }

        for name in &plan.deletes {
            if self.storage.delete(name).await {
                outcome.deleted += 1;
            } else {
                outcome.failed += 1;
            }
        }

        outcome.duration_ms = started.elapsed().as_millis() as u64;
        outcome
    }
}

// ============================================================================
// Unit tests
// ============================================================================
