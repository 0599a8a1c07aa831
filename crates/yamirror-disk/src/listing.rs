//! Listing payload types and port mapping
//!
//! The Yandex Disk API reports a folder's contents as a resource object
//! with an `_embedded.items` array; each item carries at least `name`,
//! `type` (`"file"` or `"dir"`) and, for files, a server-computed `sha256`.
//! These types deserialize that shape, and [`to_remote_listing`] maps it
//! onto the provider-agnostic port DTOs.

use serde::Deserialize;

use yamirror_core::ports::remote_storage::{RemoteEntry, RemoteListing};

/// Raw listing response for the remote folder
#[derive(Debug, Deserialize)]
pub struct ListingPayload {
    /// Embedded folder contents; absent when the resource is not a folder
    /// listing (the API never embeds contents for plain files)
    #[serde(rename = "_embedded")]
    pub embedded: Option<EmbeddedListing>,
}

/// The `_embedded` object of a folder resource
#[derive(Debug, Deserialize)]
pub struct EmbeddedListing {
    /// Direct children of the folder
    pub items: Vec<ListingItem>,
}

/// One item of a folder listing
#[derive(Debug, Deserialize)]
pub struct ListingItem {
    /// File or directory name
    pub name: String,
    /// Server-computed SHA-256 of the content, present for files
    pub sha256: Option<String>,
    /// Resource type: `"file"` or `"dir"`
    #[serde(rename = "type")]
    pub kind: String,
}

/// Convert a raw listing payload into the port-level listing.
///
/// Returns `None` when the payload embeds no contents, which callers treat
/// the same as an empty folder.
#[must_use]
pub fn to_remote_listing(payload: ListingPayload) -> Option<RemoteListing> {
    let embedded = payload.embedded?;

    let entries = embedded
        .items
        .into_iter()
        .map(|item| RemoteEntry {
            is_directory: item.kind == "dir",
            name: item.name,
            digest: item.sha256,
        })
        .collect();

    Some(RemoteListing { entries })
}

// ============================================================================
// Unit tests
// ============================================================================
