//! HTTP client for the Kanka REST API.
//!
//! Thin wrapper over reqwest with bearer auth, paginated entity listing,
//! and retrying child-record fetches. The base URL is configurable so
//! tests can point at a mock server.

use crate::error::{SyncError, SyncResult};
use crate::wire::{ChildResponse, ListResponse};
use realmpress_types::EntityKind;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for one campaign sync.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// API root, without trailing slash.
    pub api_base_url: String,
    pub campaign_id: i64,
    pub api_token: String,
    /// When false, private entities are skipped and never cached.
    pub include_private: bool,
    /// Stop paginating as soon as a whole page predates the watermark.
    /// Only sound if the API returns entities newest-first, which Kanka
    /// does not guarantee, so this defaults to off.
    pub assume_descending_order: bool,
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries.
    pub retry_base_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.kanka.io/1.0".to_string(),
            campaign_id: 0,
            api_token: String::new(),
            include_private: false,
            assume_descending_order: false,
            max_retries: 6,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

/// One page of the campaign-wide entity listing.
pub(crate) struct EntityPage {
    pub headers: Vec<crate::wire::EntityHeader>,
    pub has_next: bool,
}

/// Authenticated client for one Kanka campaign.
pub struct KankaClient {
    client: Client,
    config: SyncConfig,
}

impl KankaClient {
    pub fn new(config: SyncConfig) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    fn campaign_url(&self, suffix: &str) -> String {
        format!(
            "{}/campaigns/{}/{}",
            self.config.api_base_url, self.config.campaign_id, suffix
        )
    }

    /// GET with bearer auth and exponential backoff. Retries transient
    /// failures (429, 5xx, transport errors) up to `max_retries` attempts.
    async fn get_with_retries(&self, url: &str) -> SyncResult<Value> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.get_once(url).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_transient() && attempt < self.config.max_retries => {
                    let delay = self.config.retry_base_delay * 2u32.saturating_pow(attempt - 1);
                    warn!(url, attempt, ?delay, error = %err, "transient API failure, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(err) if err.is_transient() => {
                    return Err(SyncError::RetriesExhausted {
                        attempts: attempt,
                        url: url.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get_once(&self, url: &str) -> SyncResult<Value> {
        debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.config.api_token)
            .header("accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::Api {
                status,
                url: url.to_string(),
            });
        }
        Ok(resp.json().await?)
    }

    /// Fetches one page of the entity listing.
    pub(crate) async fn list_entities_page(&self, page: u32) -> SyncResult<EntityPage> {
        let url = format!("{}?page={page}", self.campaign_url("entities"));
        let body = self.get_with_retries(&url).await?;
        let listing: ListResponse = serde_json::from_value(body)?;
        Ok(EntityPage {
            headers: listing.data,
            has_next: listing.links.next.is_some(),
        })
    }

    /// Fetches the full child record from the type-specific endpoint.
    pub(crate) async fn fetch_child(&self, kind: EntityKind, child_id: i64) -> SyncResult<Value> {
        let url = self.campaign_url(&format!("{}/{child_id}", kind.endpoint()));
        let body = self.get_with_retries(&url).await?;
        let child: ChildResponse = serde_json::from_value(body)?;
        Ok(child.data)
    }
}
