//! The sequential pipeline runner.

use crate::config::{PipelineConfig, SyncMode};
use crate::error::{PipelineError, PipelineResult};
use realmpress_book::{assemble, BookOptions, EntityIndex};
use realmpress_publish::{Authenticator, DriveClient, DriveConfig, FileIdStore, PublishOutcome, TokenStore};
use realmpress_render::{render_html, write_html, HtmlOptions, PdfRenderer};
use realmpress_store::{EntityStore, RunLock, WatermarkStore};
use realmpress_sync::{import_archive, sync_campaign, KankaClient, SyncConfig, SyncError, SyncOutcome};
use realmpress_types::{Entity, EntityKind};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// What one pipeline run did and where its artifacts are.
#[derive(Debug)]
pub struct RunReport {
    pub sync: SyncOutcome,
    /// Entities in the book after privacy filtering.
    pub entities: usize,
    pub chapters: usize,
    pub markdown_path: PathBuf,
    pub html_path: PathBuf,
    pub pdf_path: PathBuf,
    pub published: Option<PublishOutcome>,
}

/// Runs the full pipeline: sync, assemble, render, optionally publish.
///
/// Takes an exclusive run lock inside the output directory; a second
/// concurrent run fails fast instead of racing on the cache and
/// watermark. Any stage failure aborts the run.
pub async fn run(
    config: &PipelineConfig,
    renderer: &dyn PdfRenderer,
    authenticator: Option<&dyn Authenticator>,
) -> PipelineResult<RunReport> {
    config.validate()?;
    if config.publish.is_some() && authenticator.is_none() {
        return Err(PipelineError::Config(
            "publish is configured but no authenticator was supplied".to_string(),
        ));
    }

    std::fs::create_dir_all(&config.output_dir).map_err(|source| PipelineError::Io {
        path: config.output_dir.clone(),
        source,
    })?;
    let _lock = RunLock::acquire(&config.output_dir.join("realmpress.lock"))?;

    let store = EntityStore::open(&config.output_dir.join("cache"))?;
    let watermarks = WatermarkStore::new(config.output_dir.join("last_run.json"));

    let sync = match config.mode {
        SyncMode::Api => {
            let client = KankaClient::new(SyncConfig {
                api_base_url: config.api_base_url.clone(),
                campaign_id: config.campaign_id,
                api_token: config.api_token.clone(),
                include_private: config.include_private,
                assume_descending_order: config.assume_descending_order,
                max_retries: config.max_retries,
                retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
            })?;
            sync_campaign(&client, &store, &watermarks).await?
        }
        SyncMode::Manual => {
            let archive_dir = config
                .archive_dir
                .as_deref()
                .ok_or_else(|| SyncError::ArchiveMissing(PathBuf::from("<unset>")))?;
            import_archive(archive_dir, &store, &watermarks, config.include_private)?
        }
    };

    let mut entities: Vec<Entity> = store
        .load_all()?
        .into_iter()
        .filter(|e| config.include_private || !e.is_private)
        .collect();
    // Deterministic order for index building and anchor disambiguation.
    entities.sort_by(|a, b| {
        a.kind
            .cmp(&b.kind)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then(a.entity_id.cmp(&b.entity_id))
    });

    let index = EntityIndex::build(&entities);
    let options = BookOptions {
        title: config.title.clone(),
        language: config.language,
        chapter_order: config
            .chapter_order
            .clone()
            .unwrap_or_else(|| EntityKind::CHAPTER_ORDER.to_vec()),
    };
    let book = assemble(&entities, &index, &options);

    let markdown_path = config.output_dir.join("worldbook.md");
    std::fs::write(&markdown_path, &book.markdown).map_err(|source| PipelineError::Io {
        path: markdown_path.clone(),
        source,
    })?;

    // Image references resolve against where the entity bodies came
    // from: the export tree in manual mode, the cache directory in api
    // mode.
    let image_root = match config.mode {
        SyncMode::Manual => config.archive_dir.clone(),
        SyncMode::Api => Some(config.output_dir.join("cache")),
    };
    let html = render_html(
        &book.markdown,
        &HtmlOptions {
            title: config.title.clone(),
            stylesheet: config.stylesheet.clone(),
            image_root,
        },
    )?;
    let html_path = config.output_dir.join("worldbook.html");
    write_html(&html_path, &html)?;

    let pdf_path = config.output_dir.join("worldbook.pdf");
    renderer.render(&html_path, &pdf_path, &config.title).await?;

    let published = match (&config.publish, authenticator) {
        (Some(publish), Some(authenticator)) => {
            let client = DriveClient::new(DriveConfig {
                api_base_url: publish.api_base_url.clone(),
                upload_base_url: publish.upload_base_url.clone(),
                token_endpoint: publish.token_endpoint.clone(),
                client_id: publish.client_id.clone(),
                client_secret: publish.client_secret.clone(),
                share_with_anyone: publish.share_with_anyone,
            })?;
            let tokens = TokenStore::new(config.output_dir.join("token.json"));
            let file_ids = FileIdStore::new(config.output_dir.join("drive_file_id.json"));
            let cache = client.ensure_token(&tokens, authenticator).await?;
            Some(
                client
                    .publish(&cache.access_token, &pdf_path, &publish.file_name, &file_ids)
                    .await?,
            )
        }
        _ => None,
    };

    info!(
        entities = book.toc_entities,
        chapters = book.chapters,
        published = published.is_some(),
        "pipeline run complete"
    );
    Ok(RunReport {
        sync,
        entities: book.toc_entities,
        chapters: book.chapters,
        markdown_path,
        html_path,
        pdf_path,
        published,
    })
}
