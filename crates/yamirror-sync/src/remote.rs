//! Remote manifest adapter
//!
//! Converts the raw result of a remote folder listing into the same
//! [`FileManifest`] shape the scanner produces, so the reconciler compares
//! like with like.
//!
//! An absent listing (`None`) means "no remote state" — the remote call
//! failed or the folder is empty — and maps to an empty manifest rather
//! than an error, so a first sync can still proceed. A *file* entry that
//! lacks a digest is different: the server is expected to report one, and
//! guessing a default would poison every later comparison, so it is
//! surfaced as an error instead.

use tracing::debug;

use yamirror_core::domain::{ContentDigest, FileManifest};
use yamirror_core::ports::remote_storage::RemoteListing;

use crate::SyncError;

/// Build a manifest from a remote listing, if one was obtained.
pub fn to_manifest(listing: Option<RemoteListing>) -> Result<FileManifest, SyncError> {
    let Some(listing) = listing else {
        debug!("No remote listing available, using empty manifest");
        return Ok(FileManifest::new());
    };

    let mut manifest = FileManifest::new();

    for entry in listing.entries {
        if entry.is_directory {
            continue;
        }

        let raw = entry.digest.ok_or(SyncError::MissingDigest {
            name: entry.name.clone(),
        })?;
        let digest = ContentDigest::new(raw)?;
        manifest.insert(entry.name, digest);
    }

    Ok(manifest)
}

// ============================================================================
// Unit tests
// ============================================================================
