//! Yandex Disk API client
//!
//! Provides a typed HTTP client for the Yandex Disk `resources` API.
//! Handles the OAuth authorization header, endpoint construction, and
//! status-code mapping.
//!
//! Uploads are the two-step flow the API requires: ask the `upload`
//! endpoint for a one-time target URL, then `PUT` the file bytes there.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use yamirror_disk::client::DiskClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = DiskClient::new("oauth-token-here", "backups");
//! let listing = client.get_listing().await;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use yamirror_core::ports::remote_storage::RemoteError;

use crate::listing::ListingPayload;

/// Base URL for the Yandex Disk resources API
const DISK_BASE_URL: &str = "https://cloud-api.yandex.net/v1/disk/resources";

/// Response from the upload-URL endpoint
#[derive(Debug, Deserialize)]
struct UploadUrlResponse {
    /// One-time URL the file bytes are PUT to
    href: String,
}

/// HTTP client for Yandex Disk API calls
///
/// Wraps `reqwest::Client` with the OAuth header and base URL construction.
/// All methods address files inside the one remote folder the client was
/// created for.
pub struct DiskClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: String,
    /// OAuth access token
    token: String,
    /// Remote folder the mirror writes into
    folder: String,
}

impl DiskClient {
    /// Creates a new DiskClient for `folder` with the given access token
    pub fn new(token: impl Into<String>, folder: impl Into<String>) -> Self {
        Self::with_base_url(token, folder, DISK_BASE_URL)
    }

    /// Creates a new DiskClient with a custom base URL (useful for testing)
    pub fn with_base_url(
        token: impl Into<String>,
        folder: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            token: token.into(),
            folder: folder.into(),
        }
    }

    /// Remote folder this client addresses
    #[must_use]
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Authorization header value for every request
    fn auth_header(&self) -> String {
        format!("OAuth {}", self.token)
    }

    /// API path of `name` inside the remote folder
    fn remote_path(&self, name: &str) -> String {
        format!("{}/{}", self.folder, name)
    }

    /// Fetch the metadata listing of the remote folder.
    ///
    /// Maps the API's expected failure statuses onto [`RemoteError`]:
    /// 401 means the token was rejected, 404 means the folder does not
    /// exist; anything else unexpected is a transport-level failure.
    pub async fn get_listing(&self) -> Result<ListingPayload, RemoteError> {
        debug!(folder = %self.folder, "Fetching remote listing");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("path", self.folder.as_str())])
            .header(header::AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(RemoteError::Unauthorized),
            StatusCode::NOT_FOUND => Err(RemoteError::FolderNotFound {
                path: self.folder.clone(),
            }),
            status if status.is_success() => response
                .json::<ListingPayload>()
                .await
                .map_err(|e| RemoteError::Transport(format!("malformed listing body: {e}"))),
            status => Err(RemoteError::Transport(format!(
                "unexpected status {status} from listing"
            ))),
        }
    }

    /// Request a one-time upload URL for `name`.
    ///
    /// With `overwrite` unset the API rejects the request if the file
    /// already exists remotely.
    pub async fn request_upload_url(&self, name: &str, overwrite: bool) -> Result<String> {
        let url = format!("{}/upload", self.base_url);
        let overwrite = if overwrite { "true" } else { "false" };

        let response = self
            .client
            .get(&url)
            .query(&[
                ("path", self.remote_path(name).as_str()),
                ("overwrite", overwrite),
            ])
            .header(header::AUTHORIZATION, self.auth_header())
            .send()
            .await
            .context("upload URL request failed")?
            .error_for_status()
            .context("upload URL request rejected")?;

        let body: UploadUrlResponse = response
            .json()
            .await
            .context("malformed upload URL response")?;

        Ok(body.href)
    }

    /// PUT file bytes to a previously obtained upload URL.
    ///
    /// The upload URL is pre-authorized; no auth header is needed.
    pub async fn put_file(&self, upload_url: &str, bytes: Vec<u8>) -> Result<StatusCode> {
        let response = self
            .client
            .put(upload_url)
            .body(bytes)
            .send()
            .await
            .context("file transfer failed")?;

        Ok(response.status())
    }

    /// Delete `name` from the remote folder.
    pub async fn delete(&self, name: &str) -> Result<StatusCode> {
        let response = self
            .client
            .delete(&self.base_url)
            .query(&[("path", self.remote_path(name).as_str())])
            .header(header::AUTHORIZATION, self.auth_header())
            .send()
            .await
            .context("delete request failed")?;

        Ok(response.status())
    }
}
