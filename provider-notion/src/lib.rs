//! # Notion Provider
//!
//! Implements the `RecordStore` trait for the Notion API (version 2022-06-28).
//!
//! ## Overview
//!
//! This module provides:
//! - Cursor-paginated database queries reduced to (album, artist) identities
//! - Album page creation with title, artist, play count and cover properties
//! - Bearer token authentication via the injected `HttpClient`

pub mod client;
pub mod error;
pub mod types;

pub use client::NotionClient;
pub use error::{NotionError, Result};
