//! Persisted remote file id, so re-publishing updates the same Drive
//! file and keeps the shareable link stable.

use crate::error::{PublishError, PublishResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
struct FileIdRecord {
    file_id: String,
}

#[derive(Clone, Debug)]
pub struct FileIdStore {
    path: PathBuf,
}

impl FileIdStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> PublishResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let record: FileIdRecord = serde_json::from_str(&raw)?;
                Ok(Some(record.file_id))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PublishError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    pub fn save(&self, file_id: &str) -> PublishResult<()> {
        let raw = serde_json::to_string_pretty(&FileIdRecord {
            file_id: file_id.to_string(),
        })?;
        std::fs::write(&self.path, raw).map_err(|source| PublishError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn clear(&self) -> PublishResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PublishError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileIdStore::new(dir.path().join("drive_file_id.json"));
        assert!(store.load().unwrap().is_none());
        store.save("abc123").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc123"));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
