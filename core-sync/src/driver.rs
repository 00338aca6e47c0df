//! # Sync Driver
//!
//! Decides, entry by entry and in source order, whether an album becomes a
//! new record.
//!
//! ## Rules
//!
//! 1. A play count that is missing or not an integer skips the entry.
//! 2. Missing names become [`UNKNOWN_ALBUM`] / [`UNKNOWN_ARTIST`].
//! 3. An (album, artist) key already in the store skips the entry.
//! 4. Only play counts strictly above `min_play_count` are written.
//! 5. The cover is the last image the catalog lists, or `""`.
//!
//! A failed create is recorded and the driver moves on to the next entry.

use crate::error::SyncError;
use bridge_traits::catalog::AlbumEntry;
use bridge_traits::records::{AlbumRecord, ExistingKeys, ExistingRecordKey, RecordStore};
use serde::Serialize;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const UNKNOWN_ALBUM: &str = "Unknown Album";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Default play count an album must exceed to be written
pub const DEFAULT_MIN_PLAY_COUNT: i64 = 100;

/// Driver behavior switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Albums need strictly more plays than this
    pub min_play_count: i64,
    /// Add each created key to the working set so a repeated entry later in
    /// the same run is skipped. Off by default: the snapshot stays as loaded.
    pub dedupe_within_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            min_play_count: DEFAULT_MIN_PLAY_COUNT,
            dedupe_within_run: false,
        }
    }
}

/// Why an entry was not written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    InvalidPlayCount,
    AlreadyExists,
    BelowThreshold { play_count: i64 },
}

/// Result of handling one source entry
#[derive(Debug)]
pub enum EntryOutcome {
    Created {
        key: ExistingRecordKey,
    },
    /// `key` is `None` when the entry was rejected before names were resolved
    Skipped {
        key: Option<ExistingRecordKey>,
        reason: SkipReason,
    },
    Failed {
        key: ExistingRecordKey,
        error: SyncError,
    },
}

impl EntryOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, EntryOutcome::Created { .. })
    }
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    /// Records written
    pub created: u64,
    pub skipped_existing: u64,
    pub skipped_below_threshold: u64,
    pub skipped_invalid: u64,
    /// Creates the store rejected
    pub failed: u64,
    /// Source entries processed
    pub entries_seen: u64,
    /// Size of the key snapshot the run started from
    pub existing_keys: usize,
    /// Every source page was read
    pub source_complete: bool,
    /// Every destination page was read
    pub index_complete: bool,
}

impl SyncSummary {
    pub fn record(&mut self, outcome: &EntryOutcome) {
        self.entries_seen += 1;
        match outcome {
            EntryOutcome::Created { .. } => self.created += 1,
            EntryOutcome::Skipped { reason, .. } => match reason {
                SkipReason::InvalidPlayCount => self.skipped_invalid += 1,
                SkipReason::AlreadyExists => self.skipped_existing += 1,
                SkipReason::BelowThreshold { .. } => self.skipped_below_threshold += 1,
            },
            EntryOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Total entries skipped for any reason
    pub fn total_skipped(&self) -> u64 {
        self.skipped_existing + self.skipped_below_threshold + self.skipped_invalid
    }
}

pub struct SyncDriver {
    store: Arc<dyn RecordStore>,
    options: SyncOptions,
}

impl SyncDriver {
    pub fn new(store: Arc<dyn RecordStore>, options: SyncOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Apply the rules to one entry, creating a record if it qualifies
    pub async fn process_entry(
        &self,
        entry: &AlbumEntry,
        existing_keys: &ExistingKeys,
    ) -> EntryOutcome {
        let play_count = match entry.play_count() {
            Some(count) => count,
            None => {
                warn!(
                    album = entry.name.as_deref().unwrap_or(UNKNOWN_ALBUM),
                    play_count = ?entry.play_count,
                    "Invalid play count, skipping album"
                );
                return EntryOutcome::Skipped {
                    key: None,
                    reason: SkipReason::InvalidPlayCount,
                };
            }
        };

        let key = ExistingRecordKey::new(
            entry.name.as_deref().unwrap_or(UNKNOWN_ALBUM),
            entry.artist_name.as_deref().unwrap_or(UNKNOWN_ARTIST),
        );

        if existing_keys.contains(&key) {
            info!("{} already exists, skipping", key);
            return EntryOutcome::Skipped {
                key: Some(key),
                reason: SkipReason::AlreadyExists,
            };
        }

        if play_count <= self.options.min_play_count {
            debug!(play_count, "{} is below the play count threshold", key);
            return EntryOutcome::Skipped {
                key: Some(key),
                reason: SkipReason::BelowThreshold { play_count },
            };
        }

        let record = AlbumRecord {
            album_name: key.album_name.clone(),
            artist_name: key.artist_name.clone(),
            play_count,
            cover_image_url: entry
                .largest_cover()
                .map(|cover| cover.url.clone())
                .unwrap_or_default(),
        };

        match self.store.create_record(&record).await {
            Ok(()) => {
                info!("Added {} ({} plays)", key, play_count);
                EntryOutcome::Created { key }
            }
            Err(e) => {
                warn!(error = %e, "Failed to add {}", key);
                EntryOutcome::Failed {
                    key,
                    error: SyncError::Destination(e),
                }
            }
        }
    }

    /// Run every entry through [`process_entry`](Self::process_entry)
    ///
    /// Both inputs are taken as complete, so the summary reports them that way.
    pub async fn sync(&self, entries: &[AlbumEntry], existing_keys: &ExistingKeys) -> SyncSummary {
        let mut summary = SyncSummary {
            existing_keys: existing_keys.len(),
            source_complete: true,
            index_complete: true,
            ..Default::default()
        };
        let mut working = Cow::Borrowed(existing_keys);

        self.sync_batch(entries, &mut working, &mut summary).await;
        summary
    }

    /// Process a batch against a working key set, accumulating into `summary`
    ///
    /// The set is only copied the first time within-run dedupe adds a key.
    pub(crate) async fn sync_batch(
        &self,
        entries: &[AlbumEntry],
        working: &mut Cow<'_, ExistingKeys>,
        summary: &mut SyncSummary,
    ) {
        for entry in entries {
            let outcome = self.process_entry(entry, working).await;

            if self.options.dedupe_within_run {
                if let EntryOutcome::Created { key } = &outcome {
                    working.to_mut().insert(key.clone());
                }
            }

            summary.record(&outcome);
        }
    }
}
