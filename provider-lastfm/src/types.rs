//! Last.fm API response types
//!
//! Data structures for deserializing `user.gettopalbums` responses. Last.fm
//! sends most numbers as strings and omits fields freely, so everything here
//! is lenient and normalized during conversion.

use bridge_traits::catalog::{AlbumEntry, CoverImage};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Envelope of a `user.gettopalbums` response
#[derive(Debug, Deserialize)]
pub struct TopAlbumsResponse {
    #[serde(default)]
    pub topalbums: Option<TopAlbums>,
}

/// One chart page. Albums stay raw until [`TopAlbums::entries`] so that a
/// single malformed album cannot reject the page.
#[derive(Debug, Default, Deserialize)]
pub struct TopAlbums {
    #[serde(default, deserialize_with = "null_as_default")]
    pub album: Vec<Value>,

    #[serde(rename = "@attr", default)]
    pub attr: Option<PageAttr>,
}

impl TopAlbums {
    /// Decode each album on its own, dropping the ones that do not fit
    pub fn entries(self) -> Vec<AlbumEntry> {
        self.album
            .into_iter()
            .enumerate()
            .filter_map(|(position, raw)| match serde_json::from_value::<TopAlbum>(raw) {
                Ok(album) => Some(AlbumEntry::from(album)),
                Err(e) => {
                    warn!(position, error = %e, "Skipping malformed Last.fm album");
                    None
                }
            })
            .collect()
    }
}

/// Pagination descriptor (`@attr`)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAttr {
    #[serde(default)]
    pub page: Option<Value>,

    #[serde(default)]
    pub total_pages: Option<Value>,
}

impl PageAttr {
    /// Declared total page count, 1 when absent or unparseable
    pub fn total_pages(&self) -> u32 {
        self.total_pages
            .as_ref()
            .and_then(value_as_string)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(1)
    }
}

#[derive(Debug, Deserialize)]
pub struct TopAlbum {
    #[serde(default)]
    pub name: Option<Value>,

    #[serde(default)]
    pub playcount: Option<Value>,

    #[serde(default)]
    pub artist: Option<TopAlbumArtist>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub image: Vec<AlbumImage>,
}

#[derive(Debug, Deserialize)]
pub struct TopAlbumArtist {
    #[serde(default)]
    pub name: Option<Value>,
}

/// Last.fm album image
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumImage {
    #[serde(rename = "#text", default, deserialize_with = "null_as_default")]
    pub url: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub size: String,
}

/// Last.fm error response
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: i64,
    #[serde(default)]
    pub message: String,
}

impl From<TopAlbum> for AlbumEntry {
    fn from(album: TopAlbum) -> Self {
        AlbumEntry {
            name: album.name.as_ref().and_then(value_as_string),
            artist_name: album
                .artist
                .and_then(|artist| artist.name)
                .as_ref()
                .and_then(value_as_string),
            play_count: album.playcount.as_ref().and_then(value_as_string),
            cover_images: album
                .image
                .into_iter()
                .map(|img| CoverImage::new(img.url, img.size))
                .collect(),
        }
    }
}

/// Render a scalar JSON value the way Last.fm means it
fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read `null` as the type's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_top_albums() {
        let json = r##"{
            "topalbums": {
                "album": [
                    {
                        "artist": { "url": "https://www.last.fm/music/Radiohead", "name": "Radiohead", "mbid": "" },
                        "image": [
                            { "size": "small", "#text": "https://img/s.png" },
                            { "size": "extralarge", "#text": "https://img/xl.png" }
                        ],
                        "mbid": "",
                        "url": "https://www.last.fm/music/Radiohead/OK+Computer",
                        "playcount": "321",
                        "@attr": { "rank": "1" },
                        "name": "OK Computer"
                    }
                ],
                "@attr": { "user": "listener", "totalPages": "7", "page": "1", "perPage": "50", "total": "321" }
            }
        }"##;

        let response: TopAlbumsResponse = serde_json::from_str(json).unwrap();
        let top = response.topalbums.unwrap();
        assert_eq!(top.attr.as_ref().unwrap().total_pages(), 7);

        let entries = top.entries();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.name.as_deref(), Some("OK Computer"));
        assert_eq!(entry.artist_name.as_deref(), Some("Radiohead"));
        assert_eq!(entry.play_count(), Some(321));
        assert_eq!(entry.cover_images.len(), 2);
        assert_eq!(entry.largest_cover().unwrap().url, "https://img/xl.png");
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let album: TopAlbum = serde_json::from_str(r#"{ "playcount": 12 }"#).unwrap();
        let entry: AlbumEntry = album.into();

        assert!(entry.name.is_none());
        assert!(entry.artist_name.is_none());
        assert_eq!(entry.play_count.as_deref(), Some("12"));
        assert!(entry.cover_images.is_empty());
    }

    #[test]
    fn test_total_pages_defaults_to_one() {
        let unparseable: PageAttr = serde_json::from_str(r#"{ "totalPages": "many" }"#).unwrap();
        assert_eq!(unparseable.total_pages(), 1);

        let missing = PageAttr::default();
        assert_eq!(missing.total_pages(), 1);

        let numeric: PageAttr = serde_json::from_str(r#"{ "totalPages": 3 }"#).unwrap();
        assert_eq!(numeric.total_pages(), 3);
    }

    #[test]
    fn test_deserialize_error_response() {
        let error: ErrorResponse =
            serde_json::from_str(r#"{ "error": 6, "message": "User not found" }"#).unwrap();
        assert_eq!(error.error, 6);
        assert_eq!(error.message, "User not found");
    }

    #[test]
    fn test_malformed_album_does_not_reject_page() {
        let json = r##"{
            "topalbums": {
                "album": [
                    {
                        "name": "Blue",
                        "playcount": "150",
                        "artist": { "name": "Joni Mitchell" },
                        "image": [{ "size": "large", "#text": "https://img/blue.png" }]
                    },
                    { "name": 1989, "playcount": "300", "artist": { "name": null }, "image": null },
                    { "name": "Court and Spark", "image": [{ "size": "small", "#text": null }] },
                    "not an album",
                    { "name": "Hejira", "artist": "Joni Mitchell" }
                ],
                "@attr": { "totalPages": "2" }
            }
        }"##;

        let response: TopAlbumsResponse = serde_json::from_str(json).unwrap();
        let entries = response.topalbums.unwrap().entries();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name.as_deref(), Some("Blue"));
        assert_eq!(entries[0].largest_cover().unwrap().url, "https://img/blue.png");

        assert_eq!(entries[1].name.as_deref(), Some("1989"));
        assert!(entries[1].artist_name.is_none());
        assert!(entries[1].cover_images.is_empty());
        assert_eq!(entries[1].play_count(), Some(300));

        assert_eq!(entries[2].name.as_deref(), Some("Court and Spark"));
        assert_eq!(entries[2].largest_cover().unwrap().url, "");
    }

    #[test]
    fn test_null_album_list_is_empty() {
        let top: TopAlbums = serde_json::from_str(r#"{ "album": null }"#).unwrap();
        assert!(top.entries().is_empty());
    }
}
