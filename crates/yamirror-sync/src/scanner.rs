//! Local manifest builder
//!
//! Scans the direct entries of one directory and produces a
//! [`FileManifest`] mapping each regular file's name to the SHA-256 digest
//! of its content. Subdirectories are not descended into.
//!
//! ## Error Policy
//!
//! A file that cannot be opened or read because of a permission error is
//! excluded from the manifest with a warning; the partial manifest is still
//! useful. Any other I/O failure, including an unreadable directory, aborts
//! the scan, because no trustworthy manifest can come out of it.

use std::io::ErrorKind;
use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use yamirror_core::domain::{ContentDigest, FileManifest};

use crate::SyncError;

/// Read buffer size for digest streaming. Purely a memory bound; the digest
/// does not depend on how the content is chunked.
const READ_CHUNK: usize = 8192;

/// Scan `dir` and build a manifest of its regular files.
pub async fn build_manifest(dir: &Path) -> Result<FileManifest, SyncError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut manifest = FileManifest::new();

    while let Some(entry) = entries.next_entry().await? {
        let file_type = entry.file_type().await?;
        if !file_type.is_file() {
            continue;
        }

        // Manifest keys are UTF-8 strings because the remote API addresses
        // files by UTF-8 path.
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warn!(
                    name = %raw.to_string_lossy(),
                    "Skipping file with non-UTF-8 name"
                );
                continue;
            }
        };

        match hash_file(&entry.path()).await {
            Ok(digest) => {
                debug!(file = %name, digest = %digest, "Hashed local file");
                manifest.insert(name, digest);
            }
            Err(err) if err.kind() == ErrorKind::PermissionDenied => {
                warn!(file = %name, "No access to file, excluding from manifest");
            }
            Err(err) => return Err(SyncError::Io(err)),
        }
    }

    Ok(manifest)
}

/// Stream a file's bytes through SHA-256.
async fn hash_file(path: &Path) -> std::io::Result<ContentDigest> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        let read = file.read(&mut buf).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(ContentDigest::from_bytes(hasher.finalize().into()))
}

// ============================================================================
// Unit tests
// ============================================================================
