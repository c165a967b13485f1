//! Pipeline error type, aggregating every stage's errors.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid configuration, reported before any network activity.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] realmpress_store::StoreError),

    #[error(transparent)]
    Sync(#[from] realmpress_sync::SyncError),

    #[error(transparent)]
    Render(#[from] realmpress_render::RenderError),

    #[error(transparent)]
    Publish(#[from] realmpress_publish::PublishError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
