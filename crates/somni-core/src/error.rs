//! Error types for somni-core

use thiserror::Error;

/// Result type alias using somni-core's `SyncError`
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors surfaced by the sync client and the model validators
#[derive(Error, Debug)]
pub enum SyncError {
    /// Input was rejected before any network activity
    #[error("Invalid sync input: {0}")]
    Validation(String),

    /// The record store answered with a non-2xx status
    #[error("Record store returned HTTP {0}")]
    Status(u16),

    /// The request could not be completed (DNS, connect, timeout, reset)
    #[error("Sync request failed: {0}")]
    Transport(String),
}
