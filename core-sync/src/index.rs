//! # Destination Index
//!
//! Snapshot of the (album, artist) keys already present in a [`RecordStore`].
//! The snapshot is taken once per run and only read afterwards.

use crate::error::{Result, SyncError};
use bridge_traits::records::{ExistingKeys, ExistingRecordKey, RecordStore};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Keys loaded from the store, and whether every page was read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSnapshot {
    pub keys: ExistingKeys,
    pub complete: bool,
}

enum Cursor {
    Start,
    At(String),
    Done,
}

pub struct DestinationIndex {
    store: Arc<dyn RecordStore>,
}

impl DestinationIndex {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Lazily walk the store's records, one query per polled item
    ///
    /// The first query carries no cursor; later ones carry the cursor the
    /// previous page returned. Ends when no cursor comes back, when the store
    /// hands back the cursor it was just given, or right after the first `Err`.
    pub fn pages(&self) -> BoxStream<'static, Result<Vec<ExistingRecordKey>>> {
        let store = Arc::clone(&self.store);

        stream::unfold(Cursor::Start, move |state| {
            let store = Arc::clone(&store);
            async move {
                let cursor = match state {
                    Cursor::Done => return None,
                    Cursor::Start => None,
                    Cursor::At(cursor) => Some(cursor),
                };

                match store.query_keys(cursor.clone()).await {
                    Ok((keys, next)) => {
                        let following = match next {
                            Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                                warn!(cursor = %next, "Record store repeated its cursor; stopping");
                                Cursor::Done
                            }
                            Some(next) => Cursor::At(next),
                            None => Cursor::Done,
                        };
                        Some((Ok(keys), following))
                    }
                    Err(e) => Some((Err(SyncError::Destination(e)), Cursor::Done)),
                }
            }
        })
        .boxed()
    }

    /// Load every key, noting whether pagination ran to the end
    pub async fn snapshot(&self) -> IndexSnapshot {
        let mut snapshot = IndexSnapshot {
            keys: ExistingKeys::new(),
            complete: true,
        };
        let mut pages = self.pages();

        while let Some(next) = pages.next().await {
            match next {
                Ok(keys) => {
                    debug!(records = keys.len(), "Indexed record page");
                    snapshot.keys.extend(keys);
                }
                Err(e) => {
                    warn!(error = %e, "Stopping existing record pagination");
                    snapshot.complete = false;
                }
            }
        }

        info!("Found {} existing albums", snapshot.keys.len());
        snapshot
    }

    /// Set of (album, artist) keys already stored
    ///
    /// Never fails: on a failed query the keys gathered so far are returned.
    pub async fn load_existing_keys(&self) -> ExistingKeys {
        self.snapshot().await.keys
    }
}
