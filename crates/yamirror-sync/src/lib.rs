//! yamirror Sync - One-way reconciliation engine
//!
//! Provides:
//! - Local directory scanning into a content-digest manifest
//! - Adaptation of remote listings into the same manifest shape
//! - The manifest diff algorithm and its sequential application
//! - The polling scheduler with the first-sync/steady-state machine
//!
//! ## Modules
//!
//! - [`scanner`] - Local manifest builder (SHA-256 streaming)
//! - [`remote`] - Remote listing to manifest adapter
//! - [`reconciler`] - Diff computation and operation application
//! - [`scheduler`] - Poll loop and sync phase state machine

pub mod reconciler;
pub mod remote;
pub mod scanner;
pub mod scheduler;

use thiserror::Error;

use yamirror_core::domain::DomainError;

/// Errors that can occur while building or adapting manifests
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error that invalidates the whole scan (unreadable directory,
    /// read failure that is not a permission problem)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A remote file entry arrived without a content digest
    #[error("Remote listing entry '{name}' has no content digest")]
    MissingDigest {
        /// Name of the offending entry
        name: String,
    },

    /// A domain-level error propagated from yamirror-core
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}
