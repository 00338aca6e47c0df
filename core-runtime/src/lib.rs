//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the album sync:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate holds the pieces every other crate leans on at startup: the
//! explicit [`SyncConfig`](config::SyncConfig) object handed to each
//! component's constructor, and the `tracing-subscriber` setup.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{SyncConfig, SyncConfigBuilder};
pub use error::{Error, Result};
