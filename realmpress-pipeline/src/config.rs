//! Pipeline configuration, loaded from a JSON file.

use crate::error::{PipelineError, PipelineResult};
use realmpress_book::Language;
use realmpress_types::EntityKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where entities come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Incremental fetch from the Kanka API.
    #[default]
    Api,
    /// Full import of a pre-downloaded export tree.
    Manual,
}

/// Optional Drive publish stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublishConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default = "default_true")]
    pub share_with_anyone: bool,
    #[serde(default = "default_drive_api")]
    pub api_base_url: String,
    #[serde(default = "default_drive_upload")]
    pub upload_base_url: String,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub campaign_id: i64,
    #[serde(default)]
    pub api_token: String,
    #[serde(default)]
    pub include_private: bool,
    #[serde(default)]
    pub mode: SyncMode,
    /// Export tree root, required in manual mode.
    #[serde(default)]
    pub archive_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub language: Language,
    /// Overrides the default chapter order when present.
    #[serde(default)]
    pub chapter_order: Option<Vec<EntityKind>>,
    #[serde(default)]
    pub stylesheet: Option<PathBuf>,
    #[serde(default)]
    pub assume_descending_order: bool,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_api_base")]
    pub api_base_url: String,
    #[serde(default)]
    pub publish: Option<PublishConfig>,
}

fn default_title() -> String {
    "Worldbook".to_string()
}
fn default_file_name() -> String {
    "worldbook.pdf".to_string()
}
fn default_max_retries() -> u32 {
    6
}
fn default_retry_delay_ms() -> u64 {
    500
}
fn default_api_base() -> String {
    "https://api.kanka.io/1.0".to_string()
}
fn default_drive_api() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}
fn default_drive_upload() -> String {
    "https://www.googleapis.com/upload/drive/v3".to_string()
}
fn default_token_endpoint() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}
fn default_true() -> bool {
    true
}

impl PipelineConfig {
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PipelineConfig = serde_json::from_str(&raw)
            .map_err(|err| PipelineError::Config(format!("{}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects unusable configurations before any network activity.
    pub fn validate(&self) -> PipelineResult<()> {
        match self.mode {
            SyncMode::Api => {
                if self.campaign_id <= 0 {
                    return Err(PipelineError::Config(
                        "campaign_id is required in api mode".to_string(),
                    ));
                }
                if self.api_token.trim().is_empty() {
                    return Err(PipelineError::Config(
                        "api_token is required in api mode".to_string(),
                    ));
                }
            }
            SyncMode::Manual => {
                if self.archive_dir.is_none() {
                    return Err(PipelineError::Config(
                        "archive_dir is required in manual mode".to_string(),
                    ));
                }
            }
        }
        if let Some(publish) = &self.publish {
            if publish.client_id.trim().is_empty() || publish.client_secret.trim().is_empty() {
                return Err(PipelineError::Config(
                    "publish requires client_id and client_secret".to_string(),
                ));
            }
        }
        Ok(())
    }
}
