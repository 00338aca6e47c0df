//! Notion API Client
//!
//! Reads album identities from, and appends album pages to, one Notion
//! database.
//!
//! ## API Endpoints
//!
//! - **Query**: `POST https://api.notion.com/v1/databases/{id}/query`
//! - **Create**: `POST https://api.notion.com/v1/pages`
//!
//! Every request carries `Authorization: Bearer {token}` and
//! `Notion-Version: 2022-06-28`.

use crate::error::{NotionError, Result};
use crate::types::{CreatePageRequest, QueryRequest, QueryResponse};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::records::{AlbumRecord, ExistingRecordKey, RecordStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Notion API base URL
const NOTION_API_BASE: &str = "https://api.notion.com/v1";

/// Pinned API version
pub const NOTION_VERSION: &str = "2022-06-28";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Notion client bound to one database
pub struct NotionClient {
    http_client: Arc<dyn HttpClient>,
    token: String,
    database_id: String,
    page_size: u32,
    base_url: String,
}

impl NotionClient {
    /// Creates a new Notion client
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `token` - Integration token with read and insert access to the database
    /// * `database_id` - Target database
    /// * `page_size` - Records per query page (Notion caps this at 100)
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        token: String,
        database_id: String,
        page_size: u32,
    ) -> Self {
        Self {
            http_client,
            token,
            database_id,
            page_size,
            base_url: NOTION_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn query_url(&self) -> String {
        format!(
            "{}/databases/{}/query",
            self.base_url,
            urlencoding::encode(&self.database_id)
        )
    }

    fn pages_url(&self) -> String {
        format!("{}/pages", self.base_url)
    }

    fn authorized(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest::new(method, url)
            .bearer_token(self.token.as_str())
            .header("Notion-Version", NOTION_VERSION)
            .timeout(REQUEST_TIMEOUT)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(NotionError::ApiError {
                status_code: response.status,
                message: response.text_lossy(),
            });
        }

        Ok(response)
    }

    /// Run one database query page
    async fn query_page(&self, cursor: Option<String>) -> Result<QueryResponse> {
        let body = QueryRequest {
            page_size: self.page_size,
            start_cursor: cursor,
        };
        let request = self
            .authorized(HttpMethod::Post, self.query_url())
            .json(&body)
            .map_err(|e| NotionError::Serialization(e.to_string()))?;

        let response = self.send(request).await?;

        serde_json::from_slice(&response.body).map_err(|e| {
            NotionError::ParseError(format!("Failed to parse database query response: {}", e))
        })
    }

    async fn create_page(&self, record: &AlbumRecord) -> Result<()> {
        let body = CreatePageRequest::for_album(&self.database_id, record);
        let request = self
            .authorized(HttpMethod::Post, self.pages_url())
            .json(&body)
            .map_err(|e| NotionError::Serialization(e.to_string()))?;

        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for NotionClient {
    #[instrument(skip(self))]
    async fn query_keys(
        &self,
        cursor: Option<String>,
    ) -> bridge_traits::error::Result<(Vec<ExistingRecordKey>, Option<String>)> {
        let page = self.query_page(cursor).await?;

        let keys: Vec<ExistingRecordKey> = page.results.iter().map(|p| p.record_key()).collect();

        let next_cursor = if page.has_more {
            if page.next_cursor.is_none() {
                warn!("Notion reported more results without a cursor; stopping pagination");
            }
            page.next_cursor
        } else {
            None
        };

        debug!(
            records = keys.len(),
            has_more = next_cursor.is_some(),
            "Queried Notion database page"
        );

        Ok((keys, next_cursor))
    }

    #[instrument(skip(self, record), fields(album = %record.album_name, artist = %record.artist_name))]
    async fn create_record(&self, record: &AlbumRecord) -> bridge_traits::error::Result<()> {
        Ok(self.create_page(record).await?)
    }
}
