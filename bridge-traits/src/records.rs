//! Record Store Abstraction
//!
//! Write-mostly access to the structured notes database that receives album
//! records. Reads are limited to listing the identity of what already exists.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::Result;

/// Identity of an album record already present in the store
///
/// Comparison is exact string equality on both parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExistingRecordKey {
    pub album_name: String,
    pub artist_name: String,
}

impl ExistingRecordKey {
    pub fn new(album_name: impl Into<String>, artist_name: impl Into<String>) -> Self {
        Self {
            album_name: album_name.into(),
            artist_name: artist_name.into(),
        }
    }
}

impl std::fmt::Display for ExistingRecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} by {}", self.album_name, self.artist_name)
    }
}

/// Snapshot of every record identity in the store
pub type ExistingKeys = HashSet<ExistingRecordKey>;

/// A new album record to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub album_name: String,
    pub artist_name: String,
    pub play_count: i64,
    pub cover_image_url: String,
}

impl AlbumRecord {
    pub fn key(&self) -> ExistingRecordKey {
        ExistingRecordKey::new(self.album_name.clone(), self.artist_name.clone())
    }
}

/// Record store trait
///
/// Implementations are bound to one database and its credentials at
/// construction time.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::records::RecordStore;
///
/// let mut cursor = None;
/// loop {
///     let (keys, next) = store.query_keys(cursor).await?;
///     // ...
///     cursor = next;
///     if cursor.is_none() { break; }
/// }
/// ```
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List one page of existing record identities
    ///
    /// Returns the identities on this page and the cursor for the next page,
    /// or `None` when this was the last page.
    async fn query_keys(
        &self,
        cursor: Option<String>,
    ) -> Result<(Vec<ExistingRecordKey>, Option<String>)>;

    /// Create a single album record
    async fn create_record(&self, record: &AlbumRecord) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_equality_is_exact() {
        let key = ExistingRecordKey::new("Abbey Road", "The Beatles");
        assert_eq!(key, ExistingRecordKey::new("Abbey Road", "The Beatles"));
        assert_ne!(key, ExistingRecordKey::new("abbey road", "The Beatles"));
        assert_ne!(key, ExistingRecordKey::new("Abbey Road ", "The Beatles"));
    }

    #[test]
    fn test_record_key() {
        let record = AlbumRecord {
            album_name: "Blue".to_string(),
            artist_name: "Joni Mitchell".to_string(),
            play_count: 150,
            cover_image_url: String::new(),
        };
        assert_eq!(record.key(), ExistingRecordKey::new("Blue", "Joni Mitchell"));
        assert_eq!(record.key().to_string(), "Blue by Joni Mitchell");
    }
}
