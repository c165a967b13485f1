//! Sync layer for RealmPress.
//!
//! Two ways into the entity cache:
//! - [`sync_campaign`] — incremental fetch from the Kanka API, bounded by
//!   the persisted watermark
//! - [`import_archive`] — full import of a pre-downloaded export tree
//!   (one subfolder per entity kind)
//!
//! Both respect the privacy flag and advance the watermark only on success.

mod archive;
mod client;
mod error;
mod fetcher;
mod wire;

pub use archive::import_archive;
pub use client::{KankaClient, SyncConfig};
pub use error::{SyncError, SyncResult};
pub use fetcher::{sync_campaign, SyncOutcome};
