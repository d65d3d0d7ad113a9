//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for TrackSync
///
/// Only run-level failures live here. Per-record problems (validation skips,
/// HTTP or transport failures during submission) are recorded as
/// [`SyncResult`](crate::SyncResult) values and never propagate.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TrackSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token exchange failed; fatal to the run.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Source batch could not be retrieved or parsed; fatal to the run.
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for TrackSync operations
pub type Result<T> = std::result::Result<T, TrackSyncError>;
