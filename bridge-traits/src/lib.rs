//! # Host Bridge Traits
//!
//! Abstraction traits that separate the sync core from the outside world.
//!
//! ## Overview
//!
//! This crate defines the contract between the sync core and concrete
//! implementations. Each trait represents a capability the core requires but
//! that is provided elsewhere: the HTTP transport by `bridge-desktop`, the
//! scrobble catalog by `provider-lastfm`, the record store by
//! `provider-notion`.
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with TLS and an opt-in retry policy
//!
//! ### Sync endpoints
//! - [`AlbumCatalog`](catalog::AlbumCatalog) - Paged top-album chart of a listener
//! - [`RecordStore`](records::RecordStore) - Existing record identities and record creation
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type for consistent
//! error handling. Implementations should:
//!
//! - Convert provider-specific errors to `BridgeError`
//! - Provide actionable error messages
//! - Include error context (e.g., status codes, page numbers)
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so they can be shared behind
//! `Arc` across async tasks.
//!
//! ## Examples
//!
//! ### Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod http;
pub mod logging;
pub mod records;

pub use error::BridgeError;

// Re-export commonly used types
pub use catalog::{AlbumCatalog, AlbumEntry, CoverImage, TopAlbumsPage};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use logging::LogLevel;
pub use records::{AlbumRecord, ExistingKeys, ExistingRecordKey, RecordStore};
