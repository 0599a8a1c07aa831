//! Integration tests for the folder listing call

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use yamirror_core::ports::remote_storage::{RemoteError, RemoteStorage};
use yamirror_disk::client::DiskClient;
use yamirror_disk::storage::DiskStorage;

use crate::common;

#[tokio::test]
async fn listing_returns_folder_entries() {
    let (server, storage) = common::setup_disk_storage().await;

    common::mount_listing(
        &server,
        serde_json::json!([
            { "name": "a.txt", "type": "file", "sha256": "aa".repeat(32) },
            { "name": "b.txt", "type": "file", "sha256": "bb".repeat(32) },
            { "name": "photos", "type": "dir" }
        ]),
    )
    .await;

    let listing = storage
        .list()
        .await
        .expect("listing call")
        .expect("embedded contents");

    assert_eq!(listing.entries.len(), 3);
    assert_eq!(listing.entries[0].name, "a.txt");
    assert_eq!(
        listing.entries[0].digest.as_deref(),
        Some("aa".repeat(32).as_str())
    );
    assert!(listing.entries[2].is_directory);
}

#[tokio::test]
async fn empty_folder_lists_no_entries() {
    let (server, storage) = common::setup_disk_storage().await;
    common::mount_listing(&server, serde_json::json!([])).await;

    let listing = storage
        .list()
        .await
        .expect("listing call")
        .expect("embedded contents");

    assert!(listing.entries.is_empty());
}

#[tokio::test]
async fn listing_without_embedded_contents_is_absent() {
    let (server, storage) = common::setup_disk_storage().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": common::TEST_FOLDER,
            "type": "dir"
        })))
        .mount(&server)
        .await;

    let listing = storage.list().await.expect("listing call");
    assert!(listing.is_none());
}

#[tokio::test]
async fn unauthorized_listing_maps_to_typed_error() {
    let (server, client) = common::setup_disk_mock().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Не авторизован.",
            "error": "UnauthorizedError"
        })))
        .mount(&server)
        .await;

    let result = client.get_listing().await;
    assert_eq!(result.unwrap_err(), RemoteError::Unauthorized);
}

#[tokio::test]
async fn missing_folder_maps_to_typed_error() {
    let (server, client) = common::setup_disk_mock().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Не удалось найти запрошенный ресурс.",
            "error": "DiskNotFoundError"
        })))
        .mount(&server)
        .await;

    let result = client.get_listing().await;
    assert_eq!(
        result.unwrap_err(),
        RemoteError::FolderNotFound {
            path: common::TEST_FOLDER.to_string()
        }
    );
}

#[tokio::test]
async fn server_error_maps_to_transport_error() {
    let (server, client) = common::setup_disk_mock().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.get_listing().await;
    assert!(matches!(result, Err(RemoteError::Transport(_))));
}

#[tokio::test]
async fn unreachable_server_maps_to_transport_error() {
    // Nothing listens on this port.
    let client = DiskClient::with_base_url("token", "mirror", "http://127.0.0.1:9");
    let storage = DiskStorage::new(client);

    let result = storage.list().await;
    assert!(matches!(result, Err(RemoteError::Transport(_))));
}
