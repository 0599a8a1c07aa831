//! yamirror Core - Domain logic and port definitions
//!
//! This crate contains the dependency-free heart of the mirror daemon:
//! - **Domain types** - `ContentDigest`, `FileManifest`
//! - **Configuration** - environment-driven [`config::Config`] with validation
//! - **Port definitions** - [`ports::remote_storage::RemoteStorage`], the
//!   contract boundary behind which the cloud adapter lives
//!
//! # Architecture
//!
//! The domain module holds pure data shapes with no I/O. Ports define trait
//! interfaces that adapter crates implement; the sync engine orchestrates
//! domain types through those interfaces.

pub mod config;
pub mod domain;
pub mod ports;
