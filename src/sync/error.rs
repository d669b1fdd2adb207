use thiserror::Error;

use crate::embedding::ExtractionError;
use crate::store::StoreError;

/// Sync-wide failure. The current snapshot is left untouched.
///
/// Cloneable so every caller joined onto one sync receives the same outcome.
#[derive(Error, Debug, Clone)]
pub enum SyncError {
    #[error("failed to list enrollment candidates: {0}")]
    StoreListing(#[from] StoreError),

    /// The sync task stopped before committing (panic or runtime shutdown).
    #[error("enrollment sync interrupted: {0}")]
    Interrupted(String),
}

/// Avatar download failure for one candidate.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to '{url}' failed: {message}")]
    Request { url: String, message: String },

    #[error("'{url}' returned status {status}")]
    Status { url: String, status: u16 },

    #[error("timed out after {secs}s fetching '{url}'")]
    Timeout { url: String, secs: u64 },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Why one candidate was left out of the new snapshot.
#[derive(Error, Debug)]
pub enum RecordFailure {
    #[error("avatar fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("face extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("no face detected in avatar")]
    NoFace,
}

pub type SyncResult<T> = Result<T, SyncError>;
