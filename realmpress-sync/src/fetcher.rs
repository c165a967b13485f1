//! Incremental campaign sync.
//!
//! Walks the paginated entity listing, fetches the full record for every
//! entity modified at or after the persisted watermark, and caches it.
//! The run timestamp is captured before the first request so entities
//! modified mid-run are re-fetched next time rather than lost.

use crate::client::KankaClient;
use crate::error::SyncResult;
use chrono::Utc;
use realmpress_store::{EntityStore, WatermarkStore};
use realmpress_types::{EntityKind, Watermark};
use tracing::{debug, info, warn};

/// Summary of one sync run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Entities fetched and written to the cache.
    pub fetched: usize,
    /// Entities skipped because they are private and privacy is on.
    pub skipped_private: usize,
    /// Listing entries skipped because their type string is unknown.
    pub skipped_unknown: usize,
    /// Entities untouched because they predate the watermark.
    pub unchanged: usize,
    /// Listing pages walked.
    pub pages: u32,
    /// Watermark after the run.
    pub watermark: Watermark,
}

/// Syncs a campaign into the entity cache.
///
/// Any error aborts the run and leaves the watermark untouched, so the
/// next run re-covers the same window. On success the watermark advances
/// to the moment this run started.
pub async fn sync_campaign(
    client: &KankaClient,
    store: &EntityStore,
    watermarks: &WatermarkStore,
) -> SyncResult<SyncOutcome> {
    let watermark = watermarks.load()?;
    // Captured before any request; entities changing during the run fall
    // after this and get picked up by the next one.
    let run_started = Utc::now();

    info!(
        campaign = client.config().campaign_id,
        %watermark,
        "starting sync"
    );

    let mut outcome = SyncOutcome::default();
    let mut page = 1u32;
    loop {
        let listing = client.list_entities_page(page).await?;
        outcome.pages = page;

        let all_older = !listing.headers.is_empty()
            && listing.headers.iter().all(|h| !watermark.includes(h.updated_at));

        for header in &listing.headers {
            if !watermark.includes(header.updated_at) {
                outcome.unchanged += 1;
                continue;
            }

            let Some(kind_str) = header.kind.as_deref() else {
                warn!(entity_id = header.id, name = %header.name, "listing entry has no type, skipping");
                outcome.skipped_unknown += 1;
                continue;
            };
            let kind: EntityKind = match kind_str.parse() {
                Ok(kind) => kind,
                Err(err) => {
                    warn!(entity_id = header.id, %err, "skipping");
                    outcome.skipped_unknown += 1;
                    continue;
                }
            };

            if header.is_private && !client.config().include_private {
                debug!(entity_id = header.id, "private entity skipped");
                outcome.skipped_private += 1;
                continue;
            }

            let Some(child_id) = header.child_id else {
                warn!(entity_id = header.id, "listing entry has no child id, skipping");
                outcome.skipped_unknown += 1;
                continue;
            };

            let child = client.fetch_child(kind, child_id).await?;
            let entity = crate::wire::entity_from_child(header, kind, &child);
            store.save(&entity)?;
            outcome.fetched += 1;
        }

        if !listing.has_next {
            break;
        }
        if client.config().assume_descending_order && all_older {
            debug!(page, "whole page predates watermark, stopping early");
            break;
        }
        page += 1;
    }

    outcome.watermark = watermarks.advance(run_started)?;
    info!(
        fetched = outcome.fetched,
        skipped_private = outcome.skipped_private,
        skipped_unknown = outcome.skipped_unknown,
        unchanged = outcome.unchanged,
        pages = outcome.pages,
        "sync finished"
    );
    Ok(outcome)
}
