//! Scrobble Catalog Abstraction
//!
//! Read-only access to a listener's ranked "top album" chart on a remote
//! scrobbling service. The core only ever asks for one numbered page at a
//! time; pagination policy lives with the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One cover image variant as published by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    pub url: String,
    /// Size tag (e.g. `small`, `medium`, `large`, `extralarge`)
    pub size: String,
}

impl CoverImage {
    pub fn new(url: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            size: size.into(),
        }
    }
}

/// A single ranked album as returned by the catalog
///
/// Fields are kept close to the wire: anything the service may omit is an
/// `Option`, and the play count is the raw value the service sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumEntry {
    pub name: Option<String>,
    pub artist_name: Option<String>,
    pub play_count: Option<String>,
    /// Ordered smallest to largest
    pub cover_images: Vec<CoverImage>,
}

impl AlbumEntry {
    /// Parsed play count, `None` when missing or not an integer
    pub fn play_count(&self) -> Option<i64> {
        self.play_count
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
    }

    /// Largest available cover, i.e. the last image in the list
    pub fn largest_cover(&self) -> Option<&CoverImage> {
        self.cover_images.last()
    }
}

/// One page of the top-albums chart plus its pagination descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopAlbumsPage {
    pub entries: Vec<AlbumEntry>,
    /// 1-based index of this page
    pub page: u32,
    /// Total page count declared by the service for this response
    pub total_pages: u32,
}

/// Scrobble catalog trait
///
/// Implementations are constructed with the listener identity and API
/// credentials, so requests only carry the page number.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::catalog::AlbumCatalog;
///
/// async fn first_page(catalog: &dyn AlbumCatalog) -> Result<usize> {
///     let page = catalog.top_albums_page(1).await?;
///     Ok(page.entries.len())
/// }
/// ```
#[async_trait]
pub trait AlbumCatalog: Send + Sync {
    /// Fetch a single 1-based page of the listener's top albums
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status, or a body
    /// that cannot be understood.
    async fn top_albums_page(&self, page: u32) -> Result<TopAlbumsPage>;
}
