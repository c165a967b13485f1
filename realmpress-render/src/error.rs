//! Render error types.

use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external renderer binary is not installed or not on PATH.
    #[error("{tool} not found; install it and make sure it is on PATH (e.g. from {hint})")]
    RendererMissing { tool: String, hint: String },

    /// The external renderer ran but reported failure.
    #[error("{tool} exited with {status}: {stderr}")]
    RendererFailed {
        tool: String,
        status: String,
        stderr: String,
    },
}
