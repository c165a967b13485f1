//! File-backed entity cache.
//!
//! Layout mirrors the source system's export archives: one directory per
//! entity kind (the plural endpoint name), one pretty-printed JSON file per
//! entity named `<entity_id>.json`. Files unreadable as entities are skipped
//! with a warning so a damaged cache degrades instead of aborting a run.

use crate::error::{StoreError, StoreResult};
use realmpress_types::{Entity, EntityId, EntityKind};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Entity cache rooted at a single directory.
///
/// Single-writer within a run; concurrent runs are excluded by [`crate::RunLock`].
#[derive(Clone, Debug)]
pub struct EntityStore {
    root: PathBuf,
}

impl EntityStore {
    /// Opens (creating if needed) an entity store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::io(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entity_path(&self, kind: EntityKind, id: EntityId) -> PathBuf {
        self.root.join(kind.endpoint()).join(format!("{id}.json"))
    }

    /// Saves (upserts) an entity, replacing any previous copy.
    pub fn save(&self, entity: &Entity) -> StoreResult<()> {
        let dir = self.root.join(entity.kind.endpoint());
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let path = self.entity_path(entity.kind, entity.entity_id);
        let json = serde_json::to_string_pretty(entity)?;
        fs::write(&path, json).map_err(|e| StoreError::io(&path, e))?;
        Ok(())
    }

    /// Gets a single entity, or `None` when not cached.
    pub fn get(&self, kind: EntityKind, id: EntityId) -> StoreResult<Option<Entity>> {
        let path = self.entity_path(kind, id);
        match fs::read_to_string(&path) {
            Ok(json) => {
                let entity = serde_json::from_str(&json)
                    .map_err(|e| StoreError::InvalidJson { path, source: e })?;
                Ok(Some(entity))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    /// Loads every cached entity of one kind. Order is unspecified.
    pub fn load_kind(&self, kind: EntityKind) -> StoreResult<Vec<Entity>> {
        let dir = self.root.join(kind.endpoint());
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entities = Vec::new();
        let read = fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;
        for dirent in read {
            let dirent = dirent.map_err(|e| StoreError::io(&dir, e))?;
            let path = dirent.path();
            if path.extension().and_then(|x| x.to_str()) != Some("json") {
                continue;
            }
            let json = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
            match serde_json::from_str::<Entity>(&json) {
                Ok(entity) => entities.push(entity),
                Err(e) => warn!("skipping unreadable cache file {}: {e}", path.display()),
            }
        }
        Ok(entities)
    }

    /// Loads the full cache across all kinds.
    pub fn load_all(&self) -> StoreResult<Vec<Entity>> {
        let mut entities = Vec::new();
        for kind in EntityKind::CHAPTER_ORDER {
            entities.extend(self.load_kind(kind)?);
        }
        Ok(entities)
    }

    /// Counts cached entity files across all kinds.
    pub fn count(&self) -> StoreResult<usize> {
        let mut n = 0;
        for kind in EntityKind::CHAPTER_ORDER {
            let dir = self.root.join(kind.endpoint());
            if !dir.exists() {
                continue;
            }
            let read = fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;
            for dirent in read {
                let dirent = dirent.map_err(|e| StoreError::io(&dir, e))?;
                if dirent.path().extension().and_then(|x| x.to_str()) == Some("json") {
                    n += 1;
                }
            }
        }
        Ok(n)
    }

    /// Removes every cached entity. Pair with `WatermarkStore::reset` to
    /// force a full resync.
    pub fn clear(&self) -> StoreResult<()> {
        for kind in EntityKind::CHAPTER_ORDER {
            let dir = self.root.join(kind.endpoint());
            if dir.exists() {
                fs::remove_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
            }
        }
        Ok(())
    }
}
