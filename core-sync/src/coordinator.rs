//! # Sync Coordinator
//!
//! Runs one catalog → store sync.
//!
//! ## Workflow
//!
//! 1. Snapshot the keys already in the store (all pages, once)
//! 2. Walk the catalog chart page by page
//! 3. Hand each page's entries to the driver as soon as it arrives
//! 4. Log and return the run summary
//!
//! Requests are issued one at a time, in that order.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::{SyncCoordinator, SyncOptions};
//! use std::sync::Arc;
//!
//! let coordinator = SyncCoordinator::new(
//!     Arc::new(lastfm_client),
//!     Arc::new(notion_client),
//!     SyncOptions::default(),
//! );
//! let summary = coordinator.run().await;
//! println!("{} albums added", summary.created);
//! ```

use crate::driver::{SyncDriver, SyncOptions, SyncSummary};
use crate::index::DestinationIndex;
use crate::source::SourceReader;
use bridge_traits::catalog::AlbumCatalog;
use bridge_traits::records::RecordStore;
use futures::StreamExt;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct SyncCoordinator {
    source: SourceReader,
    index: DestinationIndex,
    driver: SyncDriver,
}

impl SyncCoordinator {
    pub fn new(
        catalog: Arc<dyn AlbumCatalog>,
        store: Arc<dyn RecordStore>,
        options: SyncOptions,
    ) -> Self {
        Self {
            source: SourceReader::new(catalog),
            index: DestinationIndex::new(Arc::clone(&store)),
            driver: SyncDriver::new(store, options),
        }
    }

    /// Execute one sync run
    ///
    /// Never fails. Pagination failures show up as `source_complete` /
    /// `index_complete` being false, rejected creates as `failed`.
    #[instrument(skip(self))]
    pub async fn run(&self) -> SyncSummary {
        info!(
            min_play_count = self.driver.options().min_play_count,
            dedupe_within_run = self.driver.options().dedupe_within_run,
            "Starting album sync"
        );

        let snapshot = self.index.snapshot().await;
        let mut summary = SyncSummary {
            existing_keys: snapshot.keys.len(),
            index_complete: snapshot.complete,
            source_complete: true,
            ..Default::default()
        };
        let mut working = Cow::Borrowed(&snapshot.keys);

        let mut fetched = 0usize;
        let mut pages = self.source.pages();
        while let Some(next) = pages.next().await {
            match next {
                Ok(page) => {
                    fetched += page.entries.len();
                    self.driver
                        .sync_batch(&page.entries, &mut working, &mut summary)
                        .await;
                }
                Err(e) => {
                    warn!(error = %e, "Stopping top albums pagination");
                    summary.source_complete = false;
                }
            }
        }

        // Pages are synced as they arrive, so the total is only known after the last create
        info!("Total albums fetched: {}", fetched);
        info!(
            created = summary.created,
            skipped_existing = summary.skipped_existing,
            skipped_below_threshold = summary.skipped_below_threshold,
            skipped_invalid = summary.skipped_invalid,
            failed = summary.failed,
            source_complete = summary.source_complete,
            index_complete = summary.index_complete,
            "Album sync finished"
        );

        summary
    }
}
