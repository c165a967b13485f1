use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use realmpress_book::{assemble, BookOptions, EntityIndex, Language};
use realmpress_types::{Entity, EntityKind};

fn entity(id: i64, kind: EntityKind, name: &str, entry: Option<&str>) -> Entity {
    Entity {
        entity_id: id,
        child_id: id,
        kind,
        name: name.into(),
        entry: entry.map(String::from),
        is_private: false,
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        parent_id: None,
        location_id: None,
        tags: vec![],
    }
}

#[test]
fn three_characters_two_locations_make_two_chapters() {
    let entities = vec![
        entity(1, EntityKind::Character, "Boromir", Some("<p>Of Gondor.</p>")),
        entity(2, EntityKind::Character, "aragorn", None),
        entity(3, EntityKind::Character, "Celeborn", Some("")),
        entity(4, EntityKind::Location, "Rivendell", Some("<p>Refuge.</p>")),
        entity(5, EntityKind::Location, "Bree", None),
    ];
    let index = EntityIndex::build(&entities);
    let book = assemble(&entities, &index, &BookOptions::default());

    assert_eq!(book.chapters, 2);
    assert_eq!(book.toc_entities, 5);

    // Locations lead the default chapter order.
    let loc_pos = book.markdown.find("# Locations").unwrap();
    let char_pos = book.markdown.find("# Characters").unwrap();
    assert!(loc_pos < char_pos);

    // Alphabetical within a chapter, case-insensitive, empty bodies listed.
    let aragorn = book.markdown.find("## aragorn").unwrap();
    let boromir = book.markdown.find("## Boromir").unwrap();
    let celeborn = book.markdown.find("## Celeborn").unwrap();
    assert!(aragorn < boromir && boromir < celeborn);
}

#[test]
fn toc_lists_every_entity_once() {
    let entities: Vec<Entity> = (1..=10)
        .map(|i| entity(i, EntityKind::Note, &format!("Note {i}"), None))
        .collect();
    let index = EntityIndex::build(&entities);
    let book = assemble(&entities, &index, &BookOptions::default());

    assert_eq!(book.toc_entities, entities.len());
    for e in &entities {
        let link = format!("- [{}](#", e.name);
        assert_eq!(book.markdown.matches(&link).count(), 1, "{}", e.name);
    }
}

#[test]
fn identical_snapshots_assemble_byte_identically() {
    let entities = vec![
        entity(1, EntityKind::Character, "Alice", Some("<p>See [location:2].</p>")),
        entity(2, EntityKind::Location, "Bree", Some("<p>A town.</p>")),
    ];
    let index = EntityIndex::build(&entities);
    let a = assemble(&entities, &index, &BookOptions::default());
    let b = assemble(&entities, &index, &BookOptions::default());
    assert_eq!(a.markdown, b.markdown);
}

#[test]
fn mention_of_present_entity_links_to_its_heading() {
    let entities = vec![
        entity(1, EntityKind::Character, "Alice", Some("<p>Visits [location:2].</p>")),
        entity(2, EntityKind::Location, "Bree", None),
    ];
    let index = EntityIndex::build(&entities);
    let book = assemble(&entities, &index, &BookOptions::default());

    assert!(book.markdown.contains("[Bree](#bree)"));
    assert!(book.markdown.contains("## Bree ((++bree))"));
}

#[test]
fn absent_mention_renders_as_plain_text() {
    let entities = vec![entity(
        1,
        EntityKind::Character,
        "Frodo",
        Some("<p>Meet @[Gandalf](character:42) at the inn</p>"),
    )];
    let index = EntityIndex::build(&entities);
    let book = assemble(&entities, &index, &BookOptions::default());

    assert!(book.markdown.contains("Meet Gandalf at the inn"));
    assert!(!book.markdown.contains("Gandalf]("));
}

#[test]
fn parent_child_hierarchy_nests_headings() {
    let mut parent = entity(1, EntityKind::Location, "Eriador", None);
    parent.entry = Some("<p>A region.</p>".into());
    let mut child = entity(2, EntityKind::Location, "Bree", None);
    child.parent_id = Some(1);

    let entities = vec![parent, child];
    let index = EntityIndex::build(&entities);
    let book = assemble(&entities, &index, &BookOptions::default());

    assert!(book.markdown.contains("## Eriador ((++eriador))"));
    assert!(book.markdown.contains("### Bree ((+++bree))"));
    let toc_child = book.markdown.find("    - [Bree](#bree)").unwrap();
    let toc_parent = book.markdown.find("  - [Eriador](#eriador)").unwrap();
    assert!(toc_parent < toc_child);
}

#[test]
fn parent_excluded_from_set_promotes_child_to_root() {
    let mut child = entity(2, EntityKind::Location, "Bree", None);
    child.parent_id = Some(99);
    let entities = vec![child];
    let index = EntityIndex::build(&entities);
    let book = assemble(&entities, &index, &BookOptions::default());
    assert!(book.markdown.contains("## Bree ((++bree))"));
}

#[test]
fn details_block_shows_location_tags_and_privacy() {
    let mut alice = entity(1, EntityKind::Character, "Alice", Some("<p>Hi.</p>"));
    alice.location_id = Some(2);
    alice.tags = vec!["hero".into(), "ranger".into()];
    alice.is_private = true;
    let entities = vec![alice, entity(2, EntityKind::Location, "Bree", None)];
    let index = EntityIndex::build(&entities);
    let book = assemble(&entities, &index, &BookOptions::default());

    assert!(book.markdown.contains("*(private)*"));
    assert!(book.markdown.contains("*Location:* [Bree](#bree)"));
    assert!(book.markdown.contains("*Tags:* hero, ranger"));
}

#[test]
fn hungarian_chapter_titles_and_labels() {
    let mut alice = entity(1, EntityKind::Character, "Alice", None);
    alice.tags = vec!["hős".into()];
    let entities = vec![alice];
    let index = EntityIndex::build(&entities);
    let options = BookOptions {
        language: Language::Hu,
        ..BookOptions::default()
    };
    let book = assemble(&entities, &index, &options);

    assert!(book.markdown.contains("# Karakterek ((+karakterek))"));
    assert!(book.markdown.contains("## Tartalomjegyzék"));
    assert!(book.markdown.contains("*Címkék:* hős"));
}

#[test]
fn entity_sharing_a_chapter_name_keeps_ids_unique() {
    let entities = vec![
        entity(1, EntityKind::Location, "Locations", None),
        entity(2, EntityKind::Location, "Bree", None),
    ];
    let index = EntityIndex::build(&entities);
    let book = assemble(&entities, &index, &BookOptions::default());

    assert!(book.markdown.contains("# Locations ((+locations))"));
    assert!(book.markdown.contains("## Locations ((++locations-1))"));
    assert!(book.markdown.contains("- [Locations](#locations-1)"));
}

#[test]
fn custom_chapter_order_is_respected() {
    let entities = vec![
        entity(1, EntityKind::Character, "Alice", None),
        entity(2, EntityKind::Location, "Bree", None),
    ];
    let index = EntityIndex::build(&entities);
    let options = BookOptions {
        chapter_order: vec![EntityKind::Character, EntityKind::Location],
        ..BookOptions::default()
    };
    let book = assemble(&entities, &index, &options);
    let char_pos = book.markdown.find("# Characters").unwrap();
    let loc_pos = book.markdown.find("# Locations").unwrap();
    assert!(char_pos < loc_pos);
}
