//! Worldbook assembly.
//!
//! Orders entities into chapters, renders each entity with its resolved
//! body and details block, and emits the table of contents. Output is
//! deterministic: identical input snapshots produce byte-identical text.

use crate::index::EntityIndex;
use crate::language::Language;
use crate::markdown::{anchor_slug, html_to_markdown, md_escape};
use crate::mentions::{flatten_html_mentions, resolve_mentions};
use realmpress_types::{Entity, EntityId, EntityKind};
use std::collections::HashMap;
use tracing::info;

/// Assembly options. Defaults: English, the standard chapter order.
#[derive(Clone, Debug)]
pub struct BookOptions {
    pub title: String,
    pub language: Language,
    pub chapter_order: Vec<EntityKind>,
}

impl Default for BookOptions {
    fn default() -> Self {
        Self {
            title: "Worldbook".to_string(),
            language: Language::default(),
            chapter_order: EntityKind::CHAPTER_ORDER.to_vec(),
        }
    }
}

/// The assembled document plus counters for the run report.
#[derive(Clone, Debug)]
pub struct Worldbook {
    pub markdown: String,
    /// TOC entity entries; equals the number of entities passed in.
    pub toc_entities: usize,
    pub chapters: usize,
}

/// One entity positioned in its chapter's hierarchy.
struct Placed<'a> {
    entity: &'a Entity,
    depth: usize,
}

/// Assembles the worldbook from an already privacy-filtered entity set.
///
/// The index must be built over the same set so every anchor the TOC and
/// mention resolution emit has a matching heading. Kinds absent from the
/// set produce no chapter; entities with empty bodies are still rendered
/// and listed.
pub fn assemble(entities: &[Entity], index: &EntityIndex, options: &BookOptions) -> Worldbook {
    let mut by_kind: HashMap<EntityKind, Vec<&Entity>> = HashMap::new();
    for entity in entities {
        by_kind.entry(entity.kind).or_default().push(entity);
    }

    let mut toc = String::new();
    let mut body = String::new();
    let mut toc_entities = 0usize;
    let mut chapters = 0usize;

    for &kind in &options.chapter_order {
        let Some(members) = by_kind.get(&kind) else {
            continue;
        };
        chapters += 1;

        let title = options.language.chapter_title(kind);
        let chapter_anchor = anchor_slug(title);
        toc.push_str(&format!("- [{title}](#{chapter_anchor})\n"));
        body.push_str(&format!("\n# {title} ((+{chapter_anchor}))\n"));

        for placed in order_chapter(members) {
            toc_entities += 1;
            render_entity(&placed, index, options, &mut toc, &mut body);
        }
    }

    let mut markdown = format!(
        "# {}\n\n## {}\n\n{toc}",
        md_escape(&options.title),
        options.language.contents_label()
    );
    markdown.push_str(&body);
    if !markdown.ends_with('\n') {
        markdown.push('\n');
    }

    info!(chapters, toc_entities, "worldbook assembled");
    Worldbook {
        markdown,
        toc_entities,
        chapters,
    }
}

/// Orders a chapter's entities: parent/child hierarchy via `parent_id`
/// (child id space, same kind), siblings sorted by name
/// case-insensitively with the id as tiebreaker.
fn order_chapter<'a>(members: &[&'a Entity]) -> Vec<Placed<'a>> {
    let present: HashMap<i64, &Entity> = members.iter().map(|e| (e.child_id, *e)).collect();

    let mut children: HashMap<Option<i64>, Vec<&Entity>> = HashMap::new();
    for &entity in members {
        // A parent outside the chapter (privacy-excluded or stale data)
        // promotes the entity to a root.
        let parent = entity
            .parent_id
            .filter(|pid| present.contains_key(pid) && *pid != entity.child_id);
        children.entry(parent).or_default().push(entity);
    }
    for group in children.values_mut() {
        group.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.entity_id.cmp(&b.entity_id))
        });
    }

    let mut ordered = Vec::with_capacity(members.len());
    let roots = children.remove(&None).unwrap_or_default();
    for root in roots {
        place(root, 0, &mut children, &mut ordered);
    }
    // Orphan cycles (mutual parents) would otherwise vanish; append them flat.
    if ordered.len() < members.len() {
        let placed: std::collections::HashSet<EntityId> =
            ordered.iter().map(|p: &Placed| p.entity.entity_id).collect();
        let mut leftovers: Vec<&Entity> = members
            .iter()
            .copied()
            .filter(|e| !placed.contains(&e.entity_id))
            .collect();
        leftovers.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.entity_id.cmp(&b.entity_id))
        });
        for entity in leftovers {
            ordered.push(Placed { entity, depth: 0 });
        }
    }
    ordered
}

fn place<'a>(
    entity: &'a Entity,
    depth: usize,
    children: &mut HashMap<Option<i64>, Vec<&'a Entity>>,
    out: &mut Vec<Placed<'a>>,
) {
    out.push(Placed { entity, depth });
    if let Some(kids) = children.remove(&Some(entity.child_id)) {
        for kid in kids {
            place(kid, depth + 1, children, out);
        }
    }
}

fn render_entity(
    placed: &Placed,
    index: &EntityIndex,
    options: &BookOptions,
    toc: &mut String,
    body: &mut String,
) {
    let entity = placed.entity;
    let anchor = index
        .anchor(entity.entity_id)
        .map(String::from)
        .unwrap_or_else(|| anchor_slug(&entity.name));
    let name = md_escape(&entity.name);

    let indent = "  ".repeat(placed.depth + 1);
    toc.push_str(&format!("{indent}- [{name}](#{anchor})\n"));

    let level = "#".repeat((2 + placed.depth).min(6));
    let marker_depth = "+".repeat(placed.depth + 2);
    body.push_str(&format!("\n{level} {name} (({marker_depth}{anchor}))\n"));

    let mut details = Vec::new();
    if entity.is_private {
        details.push(format!("*({})*", options.language.private_label()));
    }
    if let Some(loc) = entity
        .location_id
        .and_then(|id| index.get_by_child(EntityKind::Location, id))
    {
        details.push(format!(
            "*{}:* [{}](#{})",
            options.language.location_label(),
            md_escape(&loc.name),
            loc.anchor
        ));
    }
    if !entity.tags.is_empty() {
        let tags: Vec<String> = entity.tags.iter().map(|t| md_escape(t)).collect();
        details.push(format!(
            "*{}:* {}",
            options.language.tags_label(),
            tags.join(", ")
        ));
    }
    if !details.is_empty() {
        body.push_str(&format!("\n{}\n", details.join(" \\\n")));
    }

    let resolved = entity
        .entry
        .as_deref()
        .map(|html| resolve_mentions(&html_to_markdown(&flatten_html_mentions(html)), index))
        .unwrap_or_default();
    if !resolved.trim().is_empty() {
        body.push_str(&format!("\n{}\n", resolved.trim()));
    }
}
