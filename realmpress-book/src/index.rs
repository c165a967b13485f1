//! Lookup index from entity id to display name and anchor.

use crate::language::Language;
use crate::markdown::anchor_slug;
use realmpress_types::{Entity, EntityId, EntityKind};
use std::collections::{HashMap, HashSet};

/// What the resolver needs to know about one entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub kind: EntityKind,
    pub anchor: String,
}

/// Id-to-anchor lookup built fresh from the cache each assembly run.
///
/// Built after privacy filtering, so excluded entities are simply absent
/// and their mentions degrade to plain text. Anchors are derived from
/// names; duplicate names get the entity id appended so every anchor in
/// one book is unique.
#[derive(Debug, Default)]
pub struct EntityIndex {
    entries: HashMap<EntityId, IndexEntry>,
    /// `parent_id` and `location_id` live in the per-type child id space,
    /// so those lookups go through this secondary key.
    by_child: HashMap<(EntityKind, i64), EntityId>,
}

impl EntityIndex {
    /// Builds the index over the given entities, in iteration order.
    ///
    /// Callers should pass a deterministically ordered slice so anchor
    /// disambiguation is stable across runs.
    pub fn build(entities: &[Entity]) -> Self {
        let mut entries = HashMap::with_capacity(entities.len());
        let mut by_child = HashMap::with_capacity(entities.len());
        // Chapter headings own their slugs; an entity named after a
        // chapter must not collide with it in any supported language.
        let mut used: HashSet<String> = Language::ALL
            .iter()
            .flat_map(|lang| {
                EntityKind::CHAPTER_ORDER
                    .iter()
                    .map(|kind| anchor_slug(lang.chapter_title(*kind)))
            })
            .collect();
        for entity in entities {
            by_child.insert((entity.kind, entity.child_id), entity.entity_id);
            let base = anchor_slug(&entity.name);
            let anchor = if used.insert(base.clone()) {
                base
            } else {
                let qualified = format!("{base}-{}", entity.entity_id);
                used.insert(qualified.clone());
                qualified
            };
            entries.insert(
                entity.entity_id,
                IndexEntry {
                    name: entity.name.clone(),
                    kind: entity.kind,
                    anchor,
                },
            );
        }
        Self { entries, by_child }
    }

    pub fn get(&self, id: EntityId) -> Option<&IndexEntry> {
        self.entries.get(&id)
    }

    /// Lookup through the per-type child id space (placement fields).
    pub fn get_by_child(&self, kind: EntityKind, child_id: i64) -> Option<&IndexEntry> {
        self.by_child
            .get(&(kind, child_id))
            .and_then(|id| self.entries.get(id))
    }

    /// Anchor for an entity, if indexed.
    pub fn anchor(&self, id: EntityId) -> Option<&str> {
        self.entries.get(&id).map(|e| e.anchor.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
