//! Remote storage port (driven/secondary port)
//!
//! This module defines the interface for the cloud folder that local files
//! are mirrored into. The primary implementation targets the Yandex Disk
//! REST API, but the trait only speaks in file names and digests, so it is
//! provider-agnostic.
//!
//! ## Design Notes
//!
//! - `list()` returns `Ok(None)` for "no remote state" (empty or absent
//!   folder). Callers treat that as an empty manifest, never as an error,
//!   so a first sync can proceed against a blank remote side.
//! - `upload`/`overwrite`/`delete` report expected failures (connection
//!   refused, rejected call, unreadable local file) as `false` after
//!   logging them. The reconciler never branches on these results beyond
//!   counting; the discrepancy persists and the next pass retries.
//! - `RemoteEntry` is a port-level DTO, not a domain type; the manifest
//!   adapter is responsible for mapping entries into a `FileManifest`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Listing DTOs
// ============================================================================

/// A single item from a remote folder listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// File or directory name
    pub name: String,
    /// Server-side SHA-256 digest, lowercase hex (absent for directories;
    /// absence on a file entry is a data-integrity defect)
    pub digest: Option<String>,
    /// Whether this entry is a directory
    pub is_directory: bool,
}

/// Contents of the remote folder as reported by one `list()` call
#[derive(Debug, Clone, Default)]
pub struct RemoteListing {
    /// Entries in server order
    pub entries: Vec<RemoteEntry>,
}

// ============================================================================
// Errors
// ============================================================================

/// Failures reported by the remote listing call
///
/// `Unauthorized` and `FolderNotFound` are fatal during startup validation;
/// if they surface mid-loop they are treated like any transient fetch
/// failure (the listing degrades to "no remote state").
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The storage rejected the access token
    #[error("Remote storage rejected the access token")]
    Unauthorized,

    /// The configured remote folder does not exist
    #[error("Remote folder not found: {path}")]
    FolderNotFound {
        /// The remote path that was requested
        path: String,
    },

    /// Connection-level failure (DNS, refused, timeout, malformed body)
    #[error("Remote storage unreachable: {0}")]
    Transport(String),
}

// ============================================================================
// RemoteStorage trait
// ============================================================================

/// Port trait for the remote side of the mirror
///
/// One network round-trip per call. Implementations own their transport
/// concerns (auth headers, URL construction, status-code mapping) and log
/// per-operation outcomes themselves.
#[async_trait::async_trait]
pub trait RemoteStorage: Send + Sync {
    /// Fetch the full listing of the remote folder
    ///
    /// Returns `Ok(None)` when the folder has no contents to report.
    async fn list(&self) -> Result<Option<RemoteListing>, RemoteError>;

    /// Upload `name` from `local_dir` as a new remote file
    ///
    /// Returns whether the file ended up stored remotely.
    async fn upload(&self, local_dir: &Path, name: &str) -> bool;

    /// Replace the remote copy of `name` with the local one
    async fn overwrite(&self, local_dir: &Path, name: &str) -> bool;

    /// Delete `name` from the remote folder
    async fn delete(&self, name: &str) -> bool;
}
