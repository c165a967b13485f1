//! Wire types for the Kanka REST API and export archives.

use chrono::{DateTime, Utc};
use realmpress_types::{Entity, EntityId, EntityKind};
use serde::Deserialize;
use serde_json::Value;

/// One entry from the campaign-wide entity listing endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct EntityHeader {
    pub id: EntityId,
    #[serde(default)]
    pub child_id: Option<i64>,
    /// Singular type string; `None`/unknown headers are skipped with a warning.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_bool_from_int_or_bool")]
    pub is_private: bool,
    pub updated_at: DateTime<Utc>,
}

/// One page of the entity listing.
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub data: Vec<EntityHeader>,
    #[serde(default)]
    pub links: Links,
}

#[derive(Debug, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub next: Option<String>,
}

/// Envelope around a single child record (`{ "data": { … } }`).
#[derive(Debug, Deserialize)]
pub struct ChildResponse {
    pub data: Value,
}

/// Accepts `0`/`1` (Kanka's historical encoding) as well as JSON booleans;
/// `null` means not private.
pub fn deserialize_bool_from_int_or_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct BoolVisitor;
    impl de::Visitor<'_> for BoolVisitor {
        type Value = bool;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a boolean or 0/1 integer")
        }
        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }
        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }
        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }
        fn visit_none<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }
    }
    deserializer.deserialize_any(BoolVisitor)
}

fn value_bool(v: Option<&Value>) -> Option<bool> {
    match v? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    }
}

fn value_i64(v: Option<&Value>) -> Option<i64> {
    v?.as_i64()
}

/// Extracts tag names from a child record's `tags` array, which may hold
/// objects (`{"name": …}`), plain strings, or bare ids (ignored).
fn extract_tags(child: &Value) -> Vec<String> {
    let Some(tags) = child.get("tags").and_then(|t| t.as_array()) else {
        return Vec::new();
    };
    tags.iter()
        .filter_map(|tag| match tag {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("name").and_then(|n| n.as_str()).map(String::from),
            _ => None,
        })
        .collect()
}

/// Builds the normalized [`Entity`] from a listing header plus the full
/// child record fetched from the type-specific endpoint.
pub fn entity_from_child(header: &EntityHeader, kind: EntityKind, child: &Value) -> Entity {
    let name = child
        .get("name")
        .and_then(|n| n.as_str())
        .map(String::from)
        .unwrap_or_else(|| header.name.clone());

    // Per-type parent field; for locations this *is* location_id, so the
    // placement field is only read for other kinds.
    let parent_id = value_i64(child.get(kind.parent_field()));
    let location_id = if kind == EntityKind::Location {
        None
    } else {
        value_i64(child.get("location_id"))
    };

    let is_private = value_bool(child.get("is_private")).unwrap_or(header.is_private);

    Entity {
        entity_id: header.id,
        child_id: header.child_id.unwrap_or_default(),
        kind,
        name,
        entry: child
            .get("entry")
            .and_then(|e| e.as_str())
            .map(String::from),
        is_private,
        updated_at: header.updated_at,
        parent_id,
        location_id,
        tags: extract_tags(child),
    }
}

/// Builds an [`Entity`] from one archive file.
///
/// Export archives carry the combined record: the child document with the
/// entity header nested under `"entity"`. Files already in RealmPress's own
/// cache format deserialize directly and short-circuit the raw path.
pub fn entity_from_archive(kind: EntityKind, value: &Value) -> Option<Entity> {
    if let Ok(entity) = serde_json::from_value::<Entity>(value.clone()) {
        return Some(entity);
    }

    let header = value.get("entity")?;
    let entity_id = value_i64(header.get("id")).or_else(|| value_i64(value.get("entity_id")))?;
    let child_id = value_i64(value.get("id")).unwrap_or_default();

    let name = value
        .get("name")
        .and_then(|n| n.as_str())
        .or_else(|| header.get("name").and_then(|n| n.as_str()))
        .unwrap_or("Unnamed")
        .to_string();

    let updated_at = value
        .get("updated_at")
        .or_else(|| header.get("updated_at"))
        .and_then(|u| u.as_str())
        .and_then(|u| DateTime::parse_from_rfc3339(u).ok())
        .map(|u| u.with_timezone(&Utc))
        .unwrap_or_else(|| realmpress_types::Watermark::epoch().timestamp());

    let is_private = value_bool(value.get("is_private"))
        .or_else(|| value_bool(header.get("is_private")))
        .unwrap_or(false);

    let parent_id = value_i64(value.get(kind.parent_field()));
    let location_id = if kind == EntityKind::Location {
        None
    } else {
        value_i64(value.get("location_id"))
    };

    Some(Entity {
        entity_id,
        child_id,
        kind,
        name,
        entry: value
            .get("entry")
            .and_then(|e| e.as_str())
            .map(String::from),
        is_private,
        updated_at,
        parent_id,
        location_id,
        tags: extract_tags(value),
    })
}
