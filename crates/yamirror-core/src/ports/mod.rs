//! Port definitions (trait interfaces for adapters)

pub mod remote_storage;
