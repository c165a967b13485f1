//! Worldbook assembly for RealmPress.
//!
//! Consumes the entity cache and produces one linear Markdown document:
//! - [`EntityIndex`] — id to anchor lookup, built fresh each run
//! - [`resolve_mentions`] — rewrites cross-entity mentions into anchors
//! - [`assemble`] — chapters, hierarchy, details blocks, table of contents
//!
//! Assembly is a pure function of its inputs; identical snapshots produce
//! byte-identical output.

mod assembler;
mod index;
mod language;
mod markdown;
mod mentions;

pub use assembler::{assemble, BookOptions, Worldbook};
pub use index::{EntityIndex, IndexEntry};
pub use language::Language;
pub use markdown::{anchor_slug, html_to_markdown, md_escape};
pub use mentions::{flatten_html_mentions, resolve_mentions};
