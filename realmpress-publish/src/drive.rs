//! Google Drive v3 upload client.
//!
//! Endpoints are configurable so tests can run against a mock server.
//! Publishing updates the previously uploaded file when its id is on
//! record, and falls back to creating a new one when the update 404s
//! (file deleted remotely).

use crate::error::{PublishError, PublishResult};
use crate::file_id::FileIdStore;
use crate::token::{Authenticator, TokenCache, TokenState, TokenStore};
use chrono::{Duration, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct DriveConfig {
    /// Drive API root, e.g. `https://www.googleapis.com/drive/v3`.
    pub api_base_url: String,
    /// Upload root, e.g. `https://www.googleapis.com/upload/drive/v3`.
    pub upload_base_url: String,
    /// OAuth token endpoint used for silent refresh.
    pub token_endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    /// Grant anyone-with-link read access after upload.
    pub share_with_anyone: bool,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://www.googleapis.com/drive/v3".to_string(),
            upload_base_url: "https://www.googleapis.com/upload/drive/v3".to_string(),
            token_endpoint: "https://oauth2.googleapis.com/token".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            share_with_anyone: true,
        }
    }
}

/// Result of one publish: where the PDF lives and how it got there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishOutcome {
    pub file_id: String,
    pub web_view_link: Option<String>,
    /// True when an existing file was updated in place.
    pub updated: bool,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct FileResponse {
    id: String,
    #[serde(rename = "webViewLink", default)]
    web_view_link: Option<String>,
}

pub struct DriveClient {
    client: Client,
    config: DriveConfig,
}

impl DriveClient {
    pub fn new(config: DriveConfig) -> PublishResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;
        Ok(Self { client, config })
    }

    /// Produces a usable access token, walking the token state machine:
    /// valid tokens pass through, expired-refreshable ones are silently
    /// refreshed, and everything else goes through the interactive flow.
    pub async fn ensure_token(
        &self,
        store: &TokenStore,
        authenticator: &dyn Authenticator,
    ) -> PublishResult<TokenCache> {
        let state = TokenState::classify(store.load()?, Utc::now());
        let cache = match state {
            TokenState::Valid(cache) => cache,
            TokenState::ExpiredRefreshable(cache) => match self.refresh(&cache).await {
                Ok(fresh) => {
                    store.save(&fresh)?;
                    fresh
                }
                Err(err) => {
                    warn!(%err, "token refresh rejected, falling back to interactive auth");
                    let fresh = authenticator.authenticate().await?;
                    store.save(&fresh)?;
                    fresh
                }
            },
            TokenState::NoToken | TokenState::ExpiredUnrefreshable => {
                debug!("no usable token, starting interactive auth");
                let fresh = authenticator.authenticate().await?;
                store.save(&fresh)?;
                fresh
            }
        };
        Ok(cache)
    }

    async fn refresh(&self, cache: &TokenCache) -> PublishResult<TokenCache> {
        let refresh_token = cache
            .refresh_token
            .as_deref()
            .ok_or_else(|| PublishError::AuthFailed("no refresh token".to_string()))?;

        let resp = self
            .client
            .post(&self.config.token_endpoint)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PublishError::AuthFailed(format!(
                "refresh rejected with {status}"
            )));
        }
        let body: RefreshResponse = resp.json().await?;
        Ok(TokenCache {
            access_token: body.access_token,
            // Google usually omits the refresh token here; keep the old one.
            refresh_token: body.refresh_token.or_else(|| cache.refresh_token.clone()),
            expires_at: Utc::now() + Duration::seconds(body.expires_in),
        })
    }

    /// Uploads the PDF, updating the file on record when possible.
    pub async fn publish(
        &self,
        access_token: &str,
        pdf_path: &Path,
        file_name: &str,
        file_ids: &FileIdStore,
    ) -> PublishResult<PublishOutcome> {
        let bytes = std::fs::read(pdf_path).map_err(|source| PublishError::Io {
            path: pdf_path.to_path_buf(),
            source,
        })?;

        if let Some(file_id) = file_ids.load()? {
            match self.update(access_token, &file_id, file_name, bytes.clone()).await {
                Ok(file) => {
                    info!(file_id = %file.id, "updated existing Drive file");
                    return Ok(PublishOutcome {
                        file_id: file.id,
                        web_view_link: file.web_view_link,
                        updated: true,
                    });
                }
                Err(PublishError::Api { status, .. }) if status == StatusCode::NOT_FOUND => {
                    warn!(file_id, "remote file gone, creating a new one");
                    file_ids.clear()?;
                }
                Err(err) => return Err(err),
            }
        }

        let file = self.create(access_token, file_name, bytes).await?;
        file_ids.save(&file.id)?;
        if self.config.share_with_anyone {
            self.grant_anyone_reader(access_token, &file.id).await?;
        }
        info!(file_id = %file.id, "created Drive file");
        Ok(PublishOutcome {
            file_id: file.id,
            web_view_link: file.web_view_link,
            updated: false,
        })
    }

    fn multipart(file_name: &str, bytes: Vec<u8>) -> PublishResult<Form> {
        let metadata = serde_json::json!({
            "name": file_name,
            "mimeType": "application/pdf",
        });
        Ok(Form::new()
            .part(
                "metadata",
                Part::text(metadata.to_string()).mime_str("application/json")?,
            )
            .part(
                "file",
                Part::bytes(bytes)
                    .file_name(file_name.to_string())
                    .mime_str("application/pdf")?,
            ))
    }

    async fn create(
        &self,
        access_token: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> PublishResult<FileResponse> {
        let url = format!(
            "{}/files?uploadType=multipart&fields=id,webViewLink",
            self.config.upload_base_url
        );
        let resp = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .multipart(Self::multipart(file_name, bytes)?)
            .send()
            .await?;
        Self::parse_file_response(resp).await
    }

    async fn update(
        &self,
        access_token: &str,
        file_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> PublishResult<FileResponse> {
        let url = format!(
            "{}/files/{file_id}?uploadType=multipart&fields=id,webViewLink",
            self.config.upload_base_url
        );
        let resp = self
            .client
            .patch(&url)
            .bearer_auth(access_token)
            .multipart(Self::multipart(file_name, bytes)?)
            .send()
            .await?;
        Self::parse_file_response(resp).await
    }

    async fn grant_anyone_reader(&self, access_token: &str, file_id: &str) -> PublishResult<()> {
        let url = format!("{}/files/{file_id}/permissions", self.config.api_base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PublishError::Api { status, body });
        }
        Ok(())
    }

    async fn parse_file_response(resp: reqwest::Response) -> PublishResult<FileResponse> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PublishError::Api { status, body });
        }
        Ok(resp.json().await?)
    }
}
