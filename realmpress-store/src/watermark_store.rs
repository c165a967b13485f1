//! Watermark persistence (`last_run.json`).

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use realmpress_types::Watermark;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct WatermarkFile {
    last_run: Watermark,
}

/// Persists the last-successful-sync watermark as a single JSON file.
///
/// The watermark only ever moves forward through [`advance`](Self::advance);
/// deleting the file (or calling [`reset`](Self::reset)) restores the epoch
/// sentinel and forces a full resync.
#[derive(Clone, Debug)]
pub struct WatermarkStore {
    path: PathBuf,
}

impl WatermarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the persisted watermark, or the epoch sentinel when absent.
    pub fn load(&self) -> StoreResult<Watermark> {
        match fs::read_to_string(&self.path) {
            Ok(json) => {
                let file: WatermarkFile = serde_json::from_str(&json)
                    .map_err(|e| StoreError::InvalidJson {
                        path: self.path.clone(),
                        source: e,
                    })?;
                Ok(file.last_run)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Watermark::epoch()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    /// Advances the watermark to `ts` and persists it.
    ///
    /// A `ts` older than the stored watermark is ignored — the invariant
    /// that the watermark never moves backwards holds even if callers pass
    /// a stale capture. Returns the watermark now on disk.
    pub fn advance(&self, ts: DateTime<Utc>) -> StoreResult<Watermark> {
        let current = self.load()?;
        let next = current.advanced_to(ts);
        if next != current {
            self.write(next)?;
            debug!("watermark advanced: {current} -> {next}");
        }
        Ok(next)
    }

    /// Resets the watermark to the epoch sentinel, forcing a full resync.
    pub fn reset(&self) -> StoreResult<()> {
        self.write(Watermark::epoch())
    }

    fn write(&self, watermark: Watermark) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&WatermarkFile { last_run: watermark })?;
        fs::write(&self.path, json).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}
