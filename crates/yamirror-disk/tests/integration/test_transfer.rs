//! Integration tests for upload, overwrite, and delete operations

use wiremock::matchers::{body_bytes, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use yamirror_core::ports::remote_storage::RemoteStorage;
use yamirror_disk::client::DiskClient;
use yamirror_disk::storage::DiskStorage;

use crate::common;

// ============================================================================
// Upload tests
// ============================================================================

#[tokio::test]
async fn upload_puts_file_bytes_to_granted_url() {
    let (server, storage) = common::setup_disk_storage().await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"file body").unwrap();

    // The PUT target verifies the exact bytes read from disk.
    Mock::given(method("GET"))
        .and(path("/upload"))
        .and(query_param("path", format!("{}/a.txt", common::TEST_FOLDER)))
        .and(query_param("overwrite", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "href": format!("{}/upload-target/a.txt", server.uri()),
            "method": "PUT",
            "templated": false
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/upload-target/a.txt"))
        .and(body_bytes(b"file body".to_vec()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    assert!(storage.upload(dir.path(), "a.txt").await);
}

#[tokio::test]
async fn overwrite_requests_replacing_upload_url() {
    let (server, storage) = common::setup_disk_storage().await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"new content").unwrap();

    Mock::given(method("GET"))
        .and(path("/upload"))
        .and(query_param("overwrite", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "href": format!("{}/upload-target/a.txt", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/upload-target/a.txt"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    assert!(storage.overwrite(dir.path(), "a.txt").await);
}

#[tokio::test]
async fn upload_of_missing_local_file_reports_failure() {
    let (_server, storage) = common::setup_disk_storage().await;
    let dir = tempfile::tempdir().unwrap();

    // No HTTP traffic should happen; the local read already fails.
    assert!(!storage.upload(dir.path(), "absent.txt").await);
}

#[tokio::test]
async fn rejected_upload_url_request_reports_failure() {
    let (server, storage) = common::setup_disk_storage().await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"body").unwrap();

    Mock::given(method("GET"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "message": "Ресурс уже существует.",
            "error": "DiskResourceAlreadyExistsError"
        })))
        .mount(&server)
        .await;

    assert!(!storage.upload(dir.path(), "a.txt").await);
}

#[tokio::test]
async fn rejected_put_reports_failure() {
    let (server, storage) = common::setup_disk_storage().await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"body").unwrap();

    common::mount_upload(&server, "a.txt", 507).await; // insufficient storage

    assert!(!storage.upload(dir.path(), "a.txt").await);
}

#[tokio::test]
async fn unreachable_server_reports_failure_not_panic() {
    let client = DiskClient::with_base_url("token", "mirror", "http://127.0.0.1:9");
    let storage = DiskStorage::new(client);

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"body").unwrap();

    assert!(!storage.upload(dir.path(), "a.txt").await);
    assert!(!storage.delete("a.txt").await);
}

// ============================================================================
// Delete tests
// ============================================================================

#[tokio::test]
async fn delete_succeeds_on_no_content() {
    let (server, storage) = common::setup_disk_storage().await;
    common::mount_delete(&server, "gone.txt", 204).await;

    assert!(storage.delete("gone.txt").await);
}

#[tokio::test]
async fn delete_succeeds_on_accepted_async_removal() {
    // Large resources are deleted asynchronously; the API answers 202.
    let (server, storage) = common::setup_disk_storage().await;
    common::mount_delete(&server, "big.bin", 202).await;

    assert!(storage.delete("big.bin").await);
}

#[tokio::test]
async fn delete_of_missing_remote_file_reports_failure() {
    let (server, storage) = common::setup_disk_storage().await;
    common::mount_delete(&server, "ghost.txt", 404).await;

    assert!(!storage.delete("ghost.txt").await);
}

// ============================================================================
// End-to-end against the storage port
// ============================================================================

#[tokio::test]
async fn full_mirror_surface_works_against_one_server() {
    let (server, storage) = common::setup_disk_storage().await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("new.txt"), b"data").unwrap();

    common::mount_listing(
        &server,
        serde_json::json!([
            { "name": "stale.txt", "type": "file", "sha256": "cc".repeat(32) }
        ]),
    )
    .await;
    common::mount_upload(&server, "new.txt", 201).await;
    common::mount_delete(&server, "stale.txt", 204).await;

    let listing = storage.list().await.unwrap().unwrap();
    assert_eq!(listing.entries.len(), 1);

    assert!(storage.upload(dir.path(), "new.txt").await);
    assert!(storage.delete("stale.txt").await);
}
