//! yamirror Disk - Yandex Disk REST adapter
//!
//! Implements the [`RemoteStorage`](yamirror_core::ports::remote_storage::RemoteStorage)
//! port against the Yandex Disk `resources` API:
//!
//! - [`client`] - typed HTTP client (auth header, endpoints, status mapping)
//! - [`listing`] - listing payload types and mapping to the port DTOs
//! - [`storage`] - the port implementation with per-operation logging

pub mod client;
pub mod listing;
pub mod storage;

pub use client::DiskClient;
pub use storage::DiskStorage;
