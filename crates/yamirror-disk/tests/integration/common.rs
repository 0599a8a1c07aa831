//! Shared test helpers for Disk API integration tests
//!
//! Provides wiremock-based mock server setup for the Yandex Disk
//! `resources` endpoints. Each helper mounts the necessary mock endpoints;
//! clients are pointed at the mock server via `with_base_url`.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use yamirror_disk::client::DiskClient;
use yamirror_disk::storage::DiskStorage;

/// Remote folder used throughout the integration tests
pub const TEST_FOLDER: &str = "mirror";

/// Starts a mock server and returns it with a client pointed at it.
pub async fn setup_disk_mock() -> (MockServer, DiskClient) {
    let server = MockServer::start().await;
    let client = DiskClient::with_base_url("test-oauth-token", TEST_FOLDER, server.uri());
    (server, client)
}

/// Same as [`setup_disk_mock`] but wraps the client in a [`DiskStorage`].
pub async fn setup_disk_storage() -> (MockServer, DiskStorage) {
    let (server, client) = setup_disk_mock().await;
    (server, DiskStorage::new(client))
}

/// Mounts the folder listing endpoint returning the given items.
pub async fn mount_listing(server: &MockServer, items: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("path", TEST_FOLDER))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": TEST_FOLDER,
            "type": "dir",
            "_embedded": {
                "items": items
            }
        })))
        .mount(server)
        .await;
}

/// Mounts the two-step upload endpoints for one file.
///
/// The upload-URL endpoint hands out a target on the mock server itself;
/// the target answers `PUT` with `put_status`.
pub async fn mount_upload(server: &MockServer, name: &str, put_status: u16) {
    let target = format!("/upload-target/{name}");

    Mock::given(method("GET"))
        .and(path("/upload"))
        .and(query_param("path", format!("{TEST_FOLDER}/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "href": format!("{}{}", server.uri(), target),
            "method": "PUT",
            "templated": false
        })))
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path(target.as_str()))
        .respond_with(ResponseTemplate::new(put_status))
        .mount(server)
        .await;
}

/// Mounts the delete endpoint for one file.
pub async fn mount_delete(server: &MockServer, name: &str, status: u16) {
    Mock::given(method("DELETE"))
        .and(path("/"))
        .and(query_param("path", format!("{TEST_FOLDER}/{name}")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
