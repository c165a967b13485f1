//! Exclusive run lock over the shared store and watermark.

use crate::error::{StoreError, StoreResult};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

/// Lock file taken for the duration of one pipeline run.
///
/// Nothing in the pipeline tolerates two runs racing on the entity cache or
/// the watermark file, so the lock is mandatory rather than advisory. The
/// file records the holder's pid for the error message; it is removed on
/// drop, and a leftover file from a crashed run must be removed by hand
/// (the error says so).
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Acquires the lock, failing immediately if another run holds it.
    pub fn acquire(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => StoreError::Locked(path.clone()),
                _ => StoreError::io(&path, e),
            })?;

        let _ = writeln!(file, "{}", std::process::id());
        Ok(Self { path })
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("failed to remove run lock {}: {e}", self.path.display());
        }
    }
}
