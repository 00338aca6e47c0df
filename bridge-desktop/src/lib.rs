//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop and server hosts
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest` with rustls
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use bridge_traits::{HttpClient, RetryPolicy};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::with_config(
//!         Duration::from_secs(30),
//!         RetryPolicy::none(),
//!     )
//!     .expect("http client");
//!
//!     // Hand to providers as Arc<dyn HttpClient>
//! }
//! ```

mod http;

pub use http::ReqwestHttpClient;
