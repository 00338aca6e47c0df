//! # Source Reader
//!
//! Reads the complete top-albums chart from an [`AlbumCatalog`].
//!
//! Page 1 is requested first. Every response declares the chart's total page
//! count, and the next page is requested until the page index passes that
//! total. A failed request ends the walk; whatever was gathered before it is
//! kept.

use crate::error::{Result, SyncError};
use bridge_traits::catalog::{AlbumCatalog, AlbumEntry, TopAlbumsPage};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

pub struct SourceReader {
    catalog: Arc<dyn AlbumCatalog>,
}

impl SourceReader {
    pub fn new(catalog: Arc<dyn AlbumCatalog>) -> Self {
        Self { catalog }
    }

    /// Lazily walk the chart, one request per polled item
    ///
    /// Yields each page in order. The stream ends after the last declared page
    /// or right after the first `Err`.
    pub fn pages(&self) -> BoxStream<'static, Result<TopAlbumsPage>> {
        let catalog = Arc::clone(&self.catalog);

        stream::unfold(Some(1u32), move |next| {
            let catalog = Arc::clone(&catalog);
            async move {
                let page = next?;

                match catalog.top_albums_page(page).await {
                    Ok(fetched) => {
                        info!("Fetched page {} of {}", page, fetched.total_pages);

                        // The most recent response decides when to stop
                        let following = (page < fetched.total_pages).then_some(page + 1);
                        Some((Ok(fetched), following))
                    }
                    Err(e) => Some((Err(SyncError::Source(e)), None)),
                }
            }
        })
        .boxed()
    }

    /// Collect every entry of the chart, in response order
    ///
    /// Never fails: a failed page is logged and the entries gathered before it
    /// are returned.
    pub async fn fetch_top_entries(&self) -> Vec<AlbumEntry> {
        let mut entries = Vec::new();
        let mut pages = self.pages();

        while let Some(next) = pages.next().await {
            match next {
                Ok(page) => entries.extend(page.entries),
                Err(e) => warn!(error = %e, "Stopping top albums pagination"),
            }
        }

        info!("Total albums fetched: {}", entries.len());
        entries
    }
}
