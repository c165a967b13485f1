//! Domain types for RealmPress.
//!
//! Shared by every other crate in the workspace:
//! - [`EntityKind`] — the closed set of campaign record types
//! - [`Entity`] — one mirrored campaign record
//! - [`Watermark`] — the last-successful-sync timestamp

mod entity;
mod kind;
mod watermark;

pub use entity::{Entity, EntityId};
pub use kind::{EntityKind, UnknownKind};
pub use watermark::Watermark;
