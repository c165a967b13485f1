//! Cross-entity mention resolution.
//!
//! Three mention forms occur in entity bodies:
//! - HTML mention anchors the source editor emits
//!   (`<a class="mention" … data-mention="[character:42]">…</a>`)
//! - named mentions `@[Display](type:id)`
//! - bare bracket mentions `[type:id]`
//!
//! Resolution is a pure function of the index. A mention whose target is
//! not indexed (deleted upstream, or excluded for privacy) degrades to
//! plain display text, never a broken link and never an error.

use crate::index::EntityIndex;
use crate::markdown::md_escape;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

static HTML_MENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a[^>]*class="mention"[^>]*data-mention="([^"]+)"[^>]*>.*?</a>"#).unwrap()
});
static NAMED_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\[([^\]]+)\]\((\w+):(\d+)\)").unwrap());
static BRACKET_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(\w+):(\d+)\]").unwrap());

/// Replaces editor mention anchors with their raw `[type:id]` payload.
///
/// Runs against the HTML body before Markdown conversion, so the
/// bracket-form pass below sees a uniform input.
pub fn flatten_html_mentions(html: &str) -> String {
    HTML_MENTION.replace_all(html, "$1").into_owned()
}

/// Rewrites every mention in a Markdown body into an anchor link.
pub fn resolve_mentions(body: &str, index: &EntityIndex) -> String {
    let named = NAMED_MENTION.replace_all(body, |caps: &Captures| {
        let display_text = &caps[1];
        let id: i64 = caps[3].parse().unwrap_or(0);
        match index.get(id) {
            Some(entry) => format!("[{}](#{})", md_escape(display_text), entry.anchor),
            None => {
                debug!(id, display = %display_text, "mention target not indexed, degrading to text");
                md_escape(display_text)
            }
        }
    });

    BRACKET_MENTION
        .replace_all(&named, |caps: &Captures| {
            let id: i64 = caps[2].parse().unwrap_or(0);
            match index.get(id) {
                Some(entry) => format!("[{}](#{})", md_escape(&entry.name), entry.anchor),
                None => {
                    debug!(id, kind = &caps[1], "mention target not indexed, degrading to text");
                    format!("Entity_{id}")
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use realmpress_types::{Entity, EntityKind};

    fn index_with(id: i64, name: &str) -> EntityIndex {
        EntityIndex::build(&[Entity {
            entity_id: id,
            child_id: id,
            kind: EntityKind::Character,
            name: name.into(),
            entry: None,
            is_private: false,
            updated_at: Utc::now(),
            parent_id: None,
            location_id: None,
            tags: vec![],
        }])
    }

    #[test]
    fn bracket_mention_resolves_to_anchor() {
        let index = index_with(42, "Gandalf");
        assert_eq!(
            resolve_mentions("Meet [character:42] at the inn", &index),
            "Meet [Gandalf](#gandalf) at the inn"
        );
    }

    #[test]
    fn named_mention_keeps_display_text() {
        let index = index_with(42, "Gandalf the Grey");
        assert_eq!(
            resolve_mentions("Meet @[Gandalf](character:42) at the inn", &index),
            "Meet [Gandalf](#gandalf-the-grey) at the inn"
        );
    }

    #[test]
    fn unresolved_named_mention_degrades_to_plain_text() {
        let index = EntityIndex::build(&[]);
        assert_eq!(
            resolve_mentions("Meet @[Gandalf](character:42) at the inn", &index),
            "Meet Gandalf at the inn"
        );
    }

    #[test]
    fn unresolved_bracket_mention_degrades_to_placeholder() {
        let index = EntityIndex::build(&[]);
        assert_eq!(resolve_mentions("See [location:7].", &index), "See Entity_7.");
    }

    #[test]
    fn html_mention_anchor_flattens_to_payload() {
        let html = r##"<a href="#" class="mention" data-mention="[character:42]">Gandalf</a>"##;
        assert_eq!(flatten_html_mentions(html), "[character:42]");
    }

    #[test]
    fn underscores_in_names_are_escaped() {
        let index = index_with(9, "dark_lord");
        assert_eq!(
            resolve_mentions("Fear [character:9]!", &index),
            r"Fear [dark\_lord](#dark_lord)!"
        );
    }
}
