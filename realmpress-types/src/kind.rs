//! Campaign entity kinds and their API endpoint mapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of campaign record types RealmPress mirrors.
///
/// The Kanka API reports these in the `type` field of an entity header;
/// each kind has its own child endpoint (plural segment).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Character,
    Location,
    Organisation,
    Family,
    Item,
    Note,
    Event,
    Race,
    Journal,
    Quest,
    Tag,
    Map,
    Calendar,
    Timeline,
    Creature,
}

/// Error returned when an API `type` string names no known kind.
///
/// The fetcher skips such entities with a warning rather than failing the run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity type: {0}")]
pub struct UnknownKind(pub String);

impl EntityKind {
    /// All kinds, in the default chapter order of the assembled worldbook.
    pub const CHAPTER_ORDER: [EntityKind; 15] = [
        EntityKind::Location,
        EntityKind::Character,
        EntityKind::Event,
        EntityKind::Organisation,
        EntityKind::Note,
        EntityKind::Item,
        EntityKind::Family,
        EntityKind::Race,
        EntityKind::Journal,
        EntityKind::Quest,
        EntityKind::Tag,
        EntityKind::Map,
        EntityKind::Calendar,
        EntityKind::Timeline,
        EntityKind::Creature,
    ];

    /// The singular `type` string used by the API and by bracket mentions.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Character => "character",
            EntityKind::Location => "location",
            EntityKind::Organisation => "organisation",
            EntityKind::Family => "family",
            EntityKind::Item => "item",
            EntityKind::Note => "note",
            EntityKind::Event => "event",
            EntityKind::Race => "race",
            EntityKind::Journal => "journal",
            EntityKind::Quest => "quest",
            EntityKind::Tag => "tag",
            EntityKind::Map => "map",
            EntityKind::Calendar => "calendar",
            EntityKind::Timeline => "timeline",
            EntityKind::Creature => "creature",
        }
    }

    /// The plural API endpoint segment, also used as the cache directory name.
    pub fn endpoint(&self) -> &'static str {
        match self {
            EntityKind::Character => "characters",
            EntityKind::Location => "locations",
            EntityKind::Organisation => "organisations",
            EntityKind::Family => "families",
            EntityKind::Item => "items",
            EntityKind::Note => "notes",
            EntityKind::Event => "events",
            EntityKind::Race => "races",
            EntityKind::Journal => "journals",
            EntityKind::Quest => "quests",
            EntityKind::Tag => "tags",
            EntityKind::Map => "maps",
            EntityKind::Calendar => "calendars",
            EntityKind::Timeline => "timelines",
            EntityKind::Creature => "creatures",
        }
    }

    /// The field name carrying the same-kind parent id in child records
    /// (Kanka uses a per-type field, e.g. `location_id` on locations).
    pub fn parent_field(&self) -> &'static str {
        match self {
            EntityKind::Character => "character_id",
            EntityKind::Location => "location_id",
            EntityKind::Organisation => "organisation_id",
            EntityKind::Family => "family_id",
            EntityKind::Item => "item_id",
            EntityKind::Note => "note_id",
            EntityKind::Event => "event_id",
            EntityKind::Race => "race_id",
            EntityKind::Journal => "journal_id",
            EntityKind::Quest => "quest_id",
            EntityKind::Tag => "tag_id",
            EntityKind::Map => "map_id",
            EntityKind::Calendar => "calendar_id",
            EntityKind::Timeline => "timeline_id",
            EntityKind::Creature => "creature_id",
        }
    }

    /// Parses a kind from either its singular `type` string or its
    /// plural endpoint segment (manual archives use directory names).
    pub fn parse(s: &str) -> Result<Self, UnknownKind> {
        let lower = s.to_ascii_lowercase();
        for kind in Self::CHAPTER_ORDER {
            if lower == kind.as_str() || lower == kind.endpoint() {
                return Ok(kind);
            }
        }
        // "organization" spelling appears in some exports
        match lower.as_str() {
            "organization" | "organizations" => Ok(EntityKind::Organisation),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
