//! Last.fm API Client
//!
//! Fetches a listener's top albums one page at a time.
//!
//! ## API Endpoints
//!
//! - **Top Albums**: `https://ws.audioscrobbler.com/2.0/?method=user.gettopalbums&user={user}&api_key={key}&format=json&limit={limit}&page={page}`
//!
//! ## Usage
//!
//! ```ignore
//! use provider_lastfm::LastFmClient;
//! use bridge_traits::catalog::AlbumCatalog;
//!
//! let client = LastFmClient::new(http_client, "api_key".to_string(), "listener".to_string(), 100);
//! let first = client.top_albums_page(1).await?;
//! println!("{} pages", first.total_pages);
//! ```

use crate::error::{LastFmError, Result};
use crate::types::{ErrorResponse, TopAlbumsResponse};
use async_trait::async_trait;
use bridge_traits::catalog::{AlbumCatalog, TopAlbumsPage};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Last.fm API base URL
const LASTFM_API_BASE: &str = "https://ws.audioscrobbler.com/2.0/";

/// Timeout for API requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Last.fm API client bound to one listener
pub struct LastFmClient {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    user: String,
    page_size: u32,
    base_url: String,
}

impl LastFmClient {
    /// Creates a new Last.fm API client
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `api_key` - Last.fm API key
    /// * `user` - Listener whose chart is read
    /// * `page_size` - Albums per page (`limit`)
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        api_key: String,
        user: String,
        page_size: u32,
    ) -> Self {
        Self {
            http_client,
            api_key,
            user,
            page_size,
            base_url: LASTFM_API_BASE.to_string(),
        }
    }

    /// Point the client at another API root (mirrors, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn top_albums_url(&self, page: u32) -> String {
        format!(
            "{}?method=user.gettopalbums&user={}&api_key={}&format=json&limit={}&page={}",
            self.base_url,
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.api_key),
            self.page_size,
            page
        )
    }

    /// Fetch and decode one page
    async fn fetch_page(&self, page: u32) -> Result<TopAlbumsPage> {
        let request = HttpRequest::new(HttpMethod::Get, self.top_albums_url(page))
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT);

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(LastFmError::ApiError {
                status_code: response.status,
                message: response.text_lossy(),
            });
        }

        // Last.fm sometimes reports errors in a 2xx body
        if let Ok(error_resp) = serde_json::from_slice::<ErrorResponse>(&response.body) {
            return Err(LastFmError::RemoteApi {
                code: error_resp.error,
                message: error_resp.message,
            });
        }

        let parsed: TopAlbumsResponse = serde_json::from_slice(&response.body)
            .map_err(|e| LastFmError::ParseError(e.to_string()))?;

        let top = parsed.topalbums.unwrap_or_default();
        let total_pages = top.attr.as_ref().map(|attr| attr.total_pages()).unwrap_or(1);
        let entries = top.entries();

        debug!(
            page,
            total_pages,
            albums = entries.len(),
            "Decoded Last.fm top albums page"
        );

        Ok(TopAlbumsPage {
            entries,
            page,
            total_pages,
        })
    }
}

#[async_trait]
impl AlbumCatalog for LastFmClient {
    #[instrument(skip(self))]
    async fn top_albums_page(&self, page: u32) -> bridge_traits::error::Result<TopAlbumsPage> {
        Ok(self.fetch_page(page).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;
    use bridge_traits::http::HttpResponse;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> bridge_traits::error::Result<HttpResponse>;
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn client(mock_http: MockHttpClient) -> LastFmClient {
        LastFmClient::new(
            Arc::new(mock_http),
            "key&secret".to_string(),
            "some user".to_string(),
            50,
        )
    }

    #[test]
    fn test_url_encodes_parameters() {
        let client = client(MockHttpClient::new());
        let url = client.top_albums_url(3);

        assert!(url.starts_with("https://ws.audioscrobbler.com/2.0/?method=user.gettopalbums"));
        assert!(url.contains("user=some%20user"));
        assert!(url.contains("api_key=key%26secret"));
        assert!(url.contains("format=json"));
        assert!(url.contains("limit=50"));
        assert!(url.ends_with("page=3"));
    }

    #[tokio::test]
    async fn test_top_albums_page_success() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .withf(|req| req.method == HttpMethod::Get && req.url.contains("page=2"))
            .returning(|_| {
                Ok(response(
                    200,
                    r##"{
                        "topalbums": {
                            "album": [
                                {
                                    "name": "Blue",
                                    "playcount": "150",
                                    "artist": { "name": "Joni Mitchell" },
                                    "image": [
                                        { "#text": "https://img/small.png", "size": "small" },
                                        { "#text": "https://img/large.png", "size": "large" }
                                    ]
                                }
                            ],
                            "@attr": { "page": "2", "totalPages": "4" }
                        }
                    }"##,
                ))
            });

        let page = client(mock_http).top_albums_page(2).await.unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].name.as_deref(), Some("Blue"));
        assert_eq!(page.entries[0].play_count(), Some(150));
    }

    #[tokio::test]
    async fn test_missing_chart_is_empty_single_page() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(200, "{}")));

        let page = client(mock_http).top_albums_page(1).await.unwrap();
        assert!(page.entries.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(500, "upstream down")));

        let result = client(mock_http).fetch_page(1).await;
        match result {
            Err(LastFmError::ApiError {
                status_code,
                message,
            }) => {
                assert_eq!(status_code, 500);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_payload_in_success_body() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(response(
                200,
                r#"{ "error": 10, "message": "Invalid API key" }"#,
            ))
        });

        let result = client(mock_http).fetch_page(1).await;
        assert!(matches!(result, Err(LastFmError::RemoteApi { code: 10, .. })));
    }

    #[tokio::test]
    async fn test_garbage_body_is_parse_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(200, "<html>")));

        let result = client(mock_http).fetch_page(1).await;
        assert!(matches!(result, Err(LastFmError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_bridge_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Err(BridgeError::OperationFailed(
                "Connection failed".to_string(),
            ))
        });

        let result = client(mock_http).top_albums_page(1).await;
        match result {
            Err(BridgeError::OperationFailed(msg)) => assert_eq!(msg, "Connection failed"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_album_keeps_rest_of_page() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(response(
                200,
                r##"{
                    "topalbums": {
                        "album": [
                            { "name": "Blue", "playcount": "150", "artist": { "name": "Joni Mitchell" }, "image": null },
                            { "name": "Hejira", "playcount": "120", "artist": "Joni Mitchell" },
                            { "name": "Court and Spark", "playcount": "130", "artist": { "name": "Joni Mitchell" } }
                        ],
                        "@attr": { "page": "1", "totalPages": "2" }
                    }
                }"##,
            ))
        });

        let page = client(mock_http).top_albums_page(1).await.unwrap();

        let names: Vec<_> = page
            .entries
            .iter()
            .filter_map(|entry| entry.name.as_deref())
            .collect();
        assert_eq!(names, vec!["Blue", "Court and Spark"]);
        assert_eq!(page.total_pages, 2);
    }
}
