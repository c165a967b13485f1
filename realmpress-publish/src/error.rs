//! Publish error types.

use thiserror::Error;

pub type PublishResult<T> = Result<T, PublishError>;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Drive API request failed: {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Interactive re-authentication was required but failed or was not
    /// possible. Fatal per the error design.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("malformed API response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
