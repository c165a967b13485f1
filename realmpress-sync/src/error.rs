//! Sync error types.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while fetching or importing entities.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed: {status} for {url}")]
    Api {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("gave up after {attempts} attempts: {url}")]
    RetriesExhausted { attempts: u32, url: String },

    #[error("malformed API response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] realmpress_store::StoreError),

    #[error("archive directory not found: {0}")]
    ArchiveMissing(std::path::PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// True for errors worth retrying: transport failures, rate limiting,
    /// and server-side errors. Client errors (bad token, missing campaign)
    /// fail fast instead of burning the retry budget.
    pub fn is_transient(&self) -> bool {
        match self {
            SyncError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            SyncError::Api { status, .. } => {
                *status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }
}
