//! Notion API request and response types
//!
//! Only the parts of the page object this sync reads or writes are modelled.
//! See: https://developers.notion.com/reference/post-database-query

use bridge_traits::records::{AlbumRecord, ExistingRecordKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Title property holding the album name
pub const ALBUM_NAME_PROPERTY: &str = "Album Name";

/// Rich text property holding the artist name
pub const ARTIST_NAME_PROPERTY: &str = "Artist Name";

/// Database query body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub page_size: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

/// Database query response
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<NotionPage>,

    #[serde(default)]
    pub has_more: bool,

    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Page object, reduced to its properties
#[derive(Debug, Default, Deserialize)]
pub struct NotionPage {
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

/// Typed property value wrapper
///
/// Only `title` and `rich_text` are read; other property types deserialize
/// with both lists empty.
#[derive(Debug, Default, Deserialize)]
pub struct PropertyValue {
    #[serde(default)]
    pub title: Vec<RichText>,

    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub text: Option<TextContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub content: String,
}

fn first_run_content(runs: &[RichText]) -> String {
    runs.first()
        .and_then(|run| run.text.as_ref())
        .map(|text| text.content.clone())
        .unwrap_or_default()
}

impl NotionPage {
    /// (album, artist) identity of this page
    ///
    /// A missing property, empty run list or non-text run reads as `""`.
    pub fn record_key(&self) -> ExistingRecordKey {
        let album_name = self
            .properties
            .get(ALBUM_NAME_PROPERTY)
            .map(|p| first_run_content(&p.title))
            .unwrap_or_default();
        let artist_name = self
            .properties
            .get(ARTIST_NAME_PROPERTY)
            .map(|p| first_run_content(&p.rich_text))
            .unwrap_or_default();

        ExistingRecordKey::new(album_name, artist_name)
    }
}

// ============================================================================
// Page creation
// ============================================================================

/// `POST /v1/pages` body for one album
#[derive(Debug, Serialize)]
pub struct CreatePageRequest<'a> {
    pub parent: Parent<'a>,
    pub properties: AlbumProperties<'a>,
}

#[derive(Debug, Serialize)]
pub struct Parent<'a> {
    pub database_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AlbumProperties<'a> {
    #[serde(rename = "Album Name")]
    pub album_name: TitleProperty<'a>,

    #[serde(rename = "Artist Name")]
    pub artist_name: RichTextProperty<'a>,

    #[serde(rename = "Play Count")]
    pub play_count: NumberProperty,

    #[serde(rename = "Album Cover")]
    pub album_cover: FilesProperty<'a>,
}

#[derive(Debug, Serialize)]
pub struct TitleProperty<'a> {
    pub title: Vec<TextRun<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RichTextProperty<'a> {
    pub rich_text: Vec<TextRun<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TextRun<'a> {
    pub text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct TextBody<'a> {
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NumberProperty {
    pub number: i64,
}

#[derive(Debug, Serialize)]
pub struct FilesProperty<'a> {
    pub files: Vec<ExternalFile<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ExternalFile<'a> {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub external: ExternalUrl<'a>,
}

#[derive(Debug, Serialize)]
pub struct ExternalUrl<'a> {
    pub url: &'a str,
}

impl<'a> CreatePageRequest<'a> {
    pub fn for_album(database_id: &'a str, record: &'a AlbumRecord) -> Self {
        Self {
            parent: Parent { database_id },
            properties: AlbumProperties {
                album_name: TitleProperty {
                    title: vec![TextRun {
                        text: TextBody {
                            content: &record.album_name,
                        },
                    }],
                },
                artist_name: RichTextProperty {
                    rich_text: vec![TextRun {
                        text: TextBody {
                            content: &record.artist_name,
                        },
                    }],
                },
                play_count: NumberProperty {
                    number: record.play_count,
                },
                album_cover: FilesProperty {
                    files: vec![ExternalFile {
                        name: format!("{} Cover", record.album_name),
                        kind: "external",
                        external: ExternalUrl {
                            url: &record.cover_image_url,
                        },
                    }],
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_request_omits_missing_cursor() {
        let first = QueryRequest {
            page_size: 100,
            start_cursor: None,
        };
        assert_eq!(serde_json::to_value(&first).unwrap(), json!({ "page_size": 100 }));

        let next = QueryRequest {
            page_size: 100,
            start_cursor: Some("abc".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&next).unwrap(),
            json!({ "page_size": 100, "start_cursor": "abc" })
        );
    }

    #[test]
    fn test_deserialize_query_response() {
        let body = json!({
            "object": "list",
            "results": [
                {
                    "object": "page",
                    "id": "p1",
                    "properties": {
                        "Album Name": { "id": "title", "type": "title", "title": [
                            { "type": "text", "text": { "content": "Blue", "link": null }, "plain_text": "Blue" }
                        ]},
                        "Artist Name": { "id": "a", "type": "rich_text", "rich_text": [
                            { "type": "text", "text": { "content": "Joni Mitchell" }, "plain_text": "Joni Mitchell" }
                        ]},
                        "Play Count": { "id": "b", "type": "number", "number": 150 },
                        "Album Cover": { "id": "c", "type": "files", "files": [] }
                    }
                }
            ],
            "has_more": true,
            "next_cursor": "cursor-2"
        });

        let response: QueryResponse = serde_json::from_value(body).unwrap();
        assert!(response.has_more);
        assert_eq!(response.next_cursor.as_deref(), Some("cursor-2"));
        assert_eq!(
            response.results[0].record_key(),
            ExistingRecordKey::new("Blue", "Joni Mitchell")
        );
    }

    #[test]
    fn test_record_key_substitutes_empty_strings() {
        let body = json!({
            "properties": {
                "Album Name": { "type": "title", "title": [] },
                "Artist Name": { "type": "rich_text", "rich_text": [
                    { "type": "mention", "mention": { "type": "user" } }
                ]}
            }
        });
        let page: NotionPage = serde_json::from_value(body).unwrap();
        assert_eq!(page.record_key(), ExistingRecordKey::new("", ""));

        let bare: NotionPage = serde_json::from_value(json!({})).unwrap();
        assert_eq!(bare.record_key(), ExistingRecordKey::new("", ""));
    }

    #[test]
    fn test_create_page_body_shape() {
        let record = AlbumRecord {
            album_name: "Blue".to_string(),
            artist_name: "Joni Mitchell".to_string(),
            play_count: 150,
            cover_image_url: "https://img/xl.png".to_string(),
        };

        let body = serde_json::to_value(CreatePageRequest::for_album("db123", &record)).unwrap();
        assert_eq!(
            body,
            json!({
                "parent": { "database_id": "db123" },
                "properties": {
                    "Album Name": { "title": [{ "text": { "content": "Blue" } }] },
                    "Artist Name": { "rich_text": [{ "text": { "content": "Joni Mitchell" } }] },
                    "Play Count": { "number": 150 },
                    "Album Cover": { "files": [{
                        "name": "Blue Cover",
                        "type": "external",
                        "external": { "url": "https://img/xl.png" }
                    }]}
                }
            })
        );
    }
}
