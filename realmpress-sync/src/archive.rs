//! Manual import from a pre-downloaded Kanka export tree.
//!
//! Export archives unpack to one subfolder per entity kind with one JSON
//! file per entity. This walks that layout, normalizes each record, and
//! fills the same cache the API sync writes to.

use crate::error::{SyncError, SyncResult};
use crate::fetcher::SyncOutcome;
use chrono::Utc;
use realmpress_store::{EntityStore, WatermarkStore};
use realmpress_types::EntityKind;
use std::path::Path;
use tracing::{info, warn};

/// Imports every recognizable entity file under `archive_root`.
///
/// Subfolders that do not name a known entity kind are ignored, as are
/// files that fail to parse; both are logged. Privacy filtering applies
/// the same as in API mode.
pub fn import_archive(
    archive_root: &Path,
    store: &EntityStore,
    watermarks: &WatermarkStore,
    include_private: bool,
) -> SyncResult<SyncOutcome> {
    if !archive_root.is_dir() {
        return Err(SyncError::ArchiveMissing(archive_root.to_path_buf()));
    }
    let run_started = Utc::now();
    let mut outcome = SyncOutcome::default();

    let dirs = std::fs::read_dir(archive_root).map_err(|source| SyncError::Io {
        path: archive_root.to_path_buf(),
        source,
    })?;
    for dir in dirs {
        let dir = dir.map_err(|source| SyncError::Io {
            path: archive_root.to_path_buf(),
            source,
        })?;
        if !dir.path().is_dir() {
            continue;
        }
        let folder = dir.file_name().to_string_lossy().into_owned();
        let kind: EntityKind = match folder.parse() {
            Ok(kind) => kind,
            Err(_) => {
                warn!(folder, "unrecognized archive subfolder, skipping");
                continue;
            }
        };
        import_kind_dir(&dir.path(), kind, store, include_private, &mut outcome)?;
    }

    outcome.watermark = watermarks.advance(run_started)?;
    info!(
        imported = outcome.fetched,
        skipped_private = outcome.skipped_private,
        skipped_unknown = outcome.skipped_unknown,
        "archive import finished"
    );
    Ok(outcome)
}

fn import_kind_dir(
    dir: &Path,
    kind: EntityKind,
    store: &EntityStore,
    include_private: bool,
    outcome: &mut SyncOutcome,
) -> SyncResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|source| SyncError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| SyncError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %path.display(), %err, "unreadable archive file, skipping");
                outcome.skipped_unknown += 1;
                continue;
            }
        };
        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(path = %path.display(), %err, "malformed archive file, skipping");
                outcome.skipped_unknown += 1;
                continue;
            }
        };
        let Some(entity) = crate::wire::entity_from_archive(kind, &value) else {
            warn!(path = %path.display(), "archive file missing entity header, skipping");
            outcome.skipped_unknown += 1;
            continue;
        };
        if entity.is_private && !include_private {
            outcome.skipped_private += 1;
            continue;
        }
        store.save(&entity)?;
        outcome.fetched += 1;
    }
    Ok(())
}
