//! lastfm-notion-sync - copies a listener's most played albums into a Notion database
//!
//! Configuration comes from the environment (see `core_runtime::config`);
//! logging is controlled with `SYNC_LOG_LEVEL`, `SYNC_LOG_FORMAT` and
//! `SYNC_LOG_FILTER`.
//!
//! Exits non-zero only when configuration or startup fails. Failed requests
//! during the sync are logged and reflected in the final summary.

use anyhow::{Context, Result};
use bridge_desktop::ReqwestHttpClient;
use bridge_traits::http::{HttpClient, RetryPolicy};
use core_runtime::logging::{init_logging, LoggingConfig};
use core_runtime::SyncConfig;
use core_sync::{SyncCoordinator, SyncOptions};
use provider_lastfm::LastFmClient;
use provider_notion::NotionClient;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let logging = LoggingConfig::from_env().context("Invalid logging configuration")?;
    init_logging(logging).context("Failed to initialize logging")?;

    info!("Starting lastfm-notion-sync");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = SyncConfig::from_env().context("Invalid sync configuration")?;
    info!(?config, "Configuration loaded");

    let policy = RetryPolicy::with_attempts(config.http_max_attempts);
    let http: Arc<dyn HttpClient> = Arc::new(
        ReqwestHttpClient::with_config(config.http_timeout, policy)
            .context("Failed to build HTTP client")?,
    );

    let catalog = LastFmClient::new(
        Arc::clone(&http),
        config.lastfm_api_key.clone(),
        config.lastfm_user.clone(),
        config.lastfm_page_size,
    );
    let store = NotionClient::new(
        http,
        config.notion_token.clone(),
        config.notion_database_id.clone(),
        config.notion_page_size,
    );

    let options = SyncOptions {
        min_play_count: config.min_play_count,
        dedupe_within_run: config.dedupe_within_run,
    };

    let summary = SyncCoordinator::new(Arc::new(catalog), Arc::new(store), options)
        .run()
        .await;

    info!(
        created = summary.created,
        skipped = summary.total_skipped(),
        failed = summary.failed,
        "Done"
    );

    Ok(())
}
