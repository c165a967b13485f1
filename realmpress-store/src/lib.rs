//! On-disk storage layer for RealmPress.
//!
//! Three small persistent pieces live here:
//! - [`EntityStore`] — the entity cache: one directory per entity kind,
//!   one JSON file per entity
//! - [`WatermarkStore`] — the `last_run.json` timestamp bounding
//!   incremental fetches
//! - [`RunLock`] — an exclusive lock file preventing two concurrent runs
//!   from racing on the cache and watermark

mod entity_store;
mod error;
mod run_lock;
mod watermark_store;

pub use entity_store::EntityStore;
pub use error::{StoreError, StoreResult};
pub use run_lock::RunLock;
pub use watermark_store::WatermarkStore;
