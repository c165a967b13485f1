//! The mirrored campaign record.

use crate::kind::EntityKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Campaign-wide entity id — the id space used by mentions.
pub type EntityId = i64;

/// One campaign record, mirrored locally by the sync fetcher.
///
/// Kanka gives every record two ids: the campaign-wide `entity_id` that
/// mentions refer to, and the per-type `child_id` that the type-specific
/// API endpoints use. Identity within a campaign is `(kind, entity_id)`.
///
/// Records are created and updated upstream only; the local copy is
/// replaced wholesale on re-sync and never mutated in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_id: EntityId,
    pub child_id: i64,
    pub kind: EntityKind,
    pub name: String,
    /// Rich-text HTML body, possibly containing mentions of other entities.
    #[serde(default)]
    pub entry: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    pub updated_at: DateTime<Utc>,
    /// Same-kind parent (child id space), e.g. a district inside a city.
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Child id of the location this record is placed at, where applicable.
    #[serde(default)]
    pub location_id: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Entity {
    /// Returns the body text, or `""` when absent.
    pub fn entry_text(&self) -> &str {
        self.entry.as_deref().unwrap_or("")
    }

    /// True when the body is absent or whitespace-only.
    ///
    /// Such entities still appear in the assembled document and its table
    /// of contents; this only controls whether a body section is emitted.
    pub fn has_empty_entry(&self) -> bool {
        self.entry_text().trim().is_empty()
    }
}
