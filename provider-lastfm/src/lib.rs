//! # Last.fm Provider
//!
//! Implements the `AlbumCatalog` trait for the Last.fm web API.
//!
//! ## Overview
//!
//! This module provides:
//! - `user.gettopalbums` page fetches for one configured listener
//! - Conversion from the Last.fm JSON shape into `AlbumEntry` values
//! - Detection of Last.fm error payloads returned with a 2xx status

pub mod client;
pub mod error;
pub mod types;

pub use client::LastFmClient;
pub use error::{LastFmError, Result};
