//! DiskStorage - RemoteStorage implementation for Yandex Disk
//!
//! Bridges the [`RemoteStorage`] port to the [`DiskClient`]. Transfer and
//! delete operations log their outcome here and collapse expected failures
//! (connection errors, rejected calls, unreadable local files) into
//! `false`, per the port contract; only the listing call reports typed
//! errors, because startup validation needs to tell an invalid token from
//! a missing folder.

use std::path::Path;

use reqwest::StatusCode;
use tracing::{info, warn};

use yamirror_core::ports::remote_storage::{RemoteError, RemoteListing, RemoteStorage};

use crate::client::DiskClient;
use crate::listing;

/// Remote storage adapter for a Yandex Disk folder
pub struct DiskStorage {
    /// The underlying API client
    client: DiskClient,
}

impl DiskStorage {
    /// Creates a new `DiskStorage` wrapping the given [`DiskClient`]
    pub fn new(client: DiskClient) -> Self {
        Self { client }
    }

    /// Read the local file and run the two-step transfer.
    async fn transfer(&self, local_dir: &Path, name: &str, overwrite: bool) -> bool {
        let path = local_dir.join(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(file = name, error = %err, "Cannot read local file for transfer");
                return false;
            }
        };

        let upload_url = match self.client.request_upload_url(name, overwrite).await {
            Ok(url) => url,
            Err(err) => {
                warn!(file = name, error = %err, "Could not obtain upload URL");
                return false;
            }
        };

        match self.client.put_file(&upload_url, bytes).await {
            Ok(status) if status.is_success() => {
                if overwrite {
                    info!(file = name, "Overwrote remote file");
                } else {
                    info!(file = name, "Uploaded new file");
                }
                true
            }
            Ok(status) => {
                warn!(file = name, %status, "Transfer rejected by storage");
                false
            }
            Err(err) => {
                warn!(file = name, error = %err, "Transfer failed");
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl RemoteStorage for DiskStorage {
    async fn list(&self) -> Result<Option<RemoteListing>, RemoteError> {
        let payload = self.client.get_listing().await?;
        Ok(listing::to_remote_listing(payload))
    }

    async fn upload(&self, local_dir: &Path, name: &str) -> bool {
        self.transfer(local_dir, name, false).await
    }

    async fn overwrite(&self, local_dir: &Path, name: &str) -> bool {
        self.transfer(local_dir, name, true).await
    }

    async fn delete(&self, name: &str) -> bool {
        match self.client.delete(name).await {
            Ok(status)
                if status == StatusCode::NO_CONTENT
                    || status == StatusCode::ACCEPTED
                    || status == StatusCode::OK =>
            {
                info!(file = name, "Deleted remote file");
                true
            }
            Ok(status) => {
                warn!(file = name, %status, "Remote delete rejected");
                false
            }
            Err(err) => {
                warn!(file = name, error = %err, "Remote delete failed");
                false
            }
        }
    }
}
