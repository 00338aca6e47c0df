//! # Sync Configuration Module
//!
//! Provides configuration management for the Last.fm → Notion album sync.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `SyncConfig`
//! instance holding every credential and tunable the pipeline needs. Each
//! component receives the values it needs at construction; nothing reads
//! process-wide state after the config is built.
//!
//! ## Required Settings
//!
//! - `LASTFM_API_KEY` - Last.fm API key
//! - `LASTFM_USER` - Listener whose top albums are synced
//! - `NOTION_TOKEN` - Notion integration token
//! - `NOTION_DATABASE_ID` - Target Notion database
//!
//! ## Optional Settings
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LASTFM_PAGE_SIZE` | 100 |
//! | `NOTION_PAGE_SIZE` | 100 |
//! | `SYNC_MIN_PLAY_COUNT` | 100 |
//! | `SYNC_DEDUPE_WITHIN_RUN` | false |
//! | `SYNC_HTTP_MAX_ATTEMPTS` | 1 (no retry) |
//! | `SYNC_HTTP_TIMEOUT_SECS` | 30 |
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::SyncConfig;
//!
//! let config = SyncConfig::builder()
//!     .lastfm_api_key("key")
//!     .lastfm_user("listener")
//!     .notion_token("secret_...")
//!     .notion_database_id("0123abcd")
//!     .build()?;
//!
//! // or, at process start
//! let config = SyncConfig::from_env()?;
//! ```

use crate::error::{Error, Result};
use crate::logging::redact_if_sensitive;
use std::time::Duration;

/// Last.fm caps `limit` at 1000 per page
pub const MAX_LASTFM_PAGE_SIZE: u32 = 1000;

/// Notion caps `page_size` at 100 per query
pub const MAX_NOTION_PAGE_SIZE: u32 = 100;

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MIN_PLAY_COUNT: i64 = 100;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Full configuration for one sync run.
///
/// Use [`SyncConfigBuilder`] or [`SyncConfig::from_env`] to construct.
#[derive(Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Last.fm API key
    pub lastfm_api_key: String,

    /// Last.fm user name whose chart is read
    pub lastfm_user: String,

    /// Albums per Last.fm page (`limit` parameter)
    pub lastfm_page_size: u32,

    /// Notion integration token (sent as bearer token)
    pub notion_token: String,

    /// Notion database receiving the album pages
    pub notion_database_id: String,

    /// Records per Notion query page
    pub notion_page_size: u32,

    /// Albums need strictly more plays than this to be imported
    pub min_play_count: i64,

    /// Add keys created during a run to the working duplicate set
    pub dedupe_within_run: bool,

    /// HTTP attempts per request; 1 disables retry
    pub http_max_attempts: u32,

    /// Per-request timeout
    pub http_timeout: Duration,
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field(
                "lastfm_api_key",
                &redact_if_sensitive("lastfm_api_key", &self.lastfm_api_key),
            )
            .field("lastfm_user", &self.lastfm_user)
            .field("lastfm_page_size", &self.lastfm_page_size)
            .field(
                "notion_token",
                &redact_if_sensitive("notion_token", &self.notion_token),
            )
            .field("notion_database_id", &self.notion_database_id)
            .field("notion_page_size", &self.notion_page_size)
            .field("min_play_count", &self.min_play_count)
            .field("dedupe_within_run", &self.dedupe_within_run)
            .field("http_max_attempts", &self.http_max_attempts)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl SyncConfig {
    /// Creates a new builder for constructing a `SyncConfig`.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut builder = Self::builder();

        if let Some(value) = get("LASTFM_API_KEY") {
            builder = builder.lastfm_api_key(value);
        }
        if let Some(value) = get("LASTFM_USER") {
            builder = builder.lastfm_user(value);
        }
        if let Some(value) = get("NOTION_TOKEN") {
            builder = builder.notion_token(value);
        }
        if let Some(value) = get("NOTION_DATABASE_ID") {
            builder = builder.notion_database_id(value);
        }
        if let Some(value) = get("LASTFM_PAGE_SIZE") {
            builder = builder.lastfm_page_size(parse_number("LASTFM_PAGE_SIZE", &value)?);
        }
        if let Some(value) = get("NOTION_PAGE_SIZE") {
            builder = builder.notion_page_size(parse_number("NOTION_PAGE_SIZE", &value)?);
        }
        if let Some(value) = get("SYNC_MIN_PLAY_COUNT") {
            builder = builder.min_play_count(parse_number("SYNC_MIN_PLAY_COUNT", &value)?);
        }
        if let Some(value) = get("SYNC_DEDUPE_WITHIN_RUN") {
            builder = builder.dedupe_within_run(parse_bool("SYNC_DEDUPE_WITHIN_RUN", &value)?);
        }
        if let Some(value) = get("SYNC_HTTP_MAX_ATTEMPTS") {
            builder = builder.http_max_attempts(parse_number("SYNC_HTTP_MAX_ATTEMPTS", &value)?);
        }
        if let Some(value) = get("SYNC_HTTP_TIMEOUT_SECS") {
            let secs: u64 = parse_number("SYNC_HTTP_TIMEOUT_SECS", &value)?;
            builder = builder.http_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Credentials and identifiers are not blank
    /// - Page sizes are within the API limits
    /// - HTTP attempt budget and timeout are non-zero
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("LASTFM_API_KEY", &self.lastfm_api_key),
            ("LASTFM_USER", &self.lastfm_user),
            ("NOTION_TOKEN", &self.notion_token),
            ("NOTION_DATABASE_ID", &self.notion_database_id),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} cannot be empty", name)));
            }
        }

        if self.lastfm_page_size == 0 || self.lastfm_page_size > MAX_LASTFM_PAGE_SIZE {
            return Err(Error::Config(format!(
                "Last.fm page size must be between 1 and {}",
                MAX_LASTFM_PAGE_SIZE
            )));
        }

        if self.notion_page_size == 0 || self.notion_page_size > MAX_NOTION_PAGE_SIZE {
            return Err(Error::Config(format!(
                "Notion page size must be between 1 and {}",
                MAX_NOTION_PAGE_SIZE
            )));
        }

        if self.http_max_attempts == 0 {
            return Err(Error::Config(
                "HTTP max attempts must be at least 1".to_string(),
            ));
        }

        if self.http_timeout.is_zero() {
            return Err(Error::Config(
                "HTTP timeout must be greater than 0 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(variable: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::Config(format!(
            "{} must be an integer, got '{}'",
            variable, value
        ))
    })
}

fn parse_bool(variable: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "{} must be a boolean, got '{}'",
            variable, value
        ))),
    }
}

fn missing(variable: &str, message: &str) -> Error {
    Error::MissingSetting {
        variable: variable.to_string(),
        message: message.to_string(),
    }
}

/// Builder for constructing [`SyncConfig`] instances.
///
/// Required values have no default; [`build()`](SyncConfigBuilder::build)
/// fails with an actionable [`Error::MissingSetting`] naming the environment
/// variable that supplies the value.
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    lastfm_api_key: Option<String>,
    lastfm_user: Option<String>,
    lastfm_page_size: Option<u32>,
    notion_token: Option<String>,
    notion_database_id: Option<String>,
    notion_page_size: Option<u32>,
    min_play_count: Option<i64>,
    dedupe_within_run: bool,
    http_max_attempts: Option<u32>,
    http_timeout: Option<Duration>,
}

impl SyncConfigBuilder {
    pub fn lastfm_api_key(mut self, key: impl Into<String>) -> Self {
        self.lastfm_api_key = Some(key.into());
        self
    }

    pub fn lastfm_user(mut self, user: impl Into<String>) -> Self {
        self.lastfm_user = Some(user.into());
        self
    }

    pub fn lastfm_page_size(mut self, size: u32) -> Self {
        self.lastfm_page_size = Some(size);
        self
    }

    pub fn notion_token(mut self, token: impl Into<String>) -> Self {
        self.notion_token = Some(token.into());
        self
    }

    pub fn notion_database_id(mut self, id: impl Into<String>) -> Self {
        self.notion_database_id = Some(id.into());
        self
    }

    pub fn notion_page_size(mut self, size: u32) -> Self {
        self.notion_page_size = Some(size);
        self
    }

    pub fn min_play_count(mut self, count: i64) -> Self {
        self.min_play_count = Some(count);
        self
    }

    pub fn dedupe_within_run(mut self, enable: bool) -> Self {
        self.dedupe_within_run = enable;
        self
    }

    pub fn http_max_attempts(mut self, attempts: u32) -> Self {
        self.http_max_attempts = Some(attempts);
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSetting`] for an absent credential or
    /// identifier, and [`Error::Config`] when a value is out of range.
    pub fn build(self) -> Result<SyncConfig> {
        let config = SyncConfig {
            lastfm_api_key: self.lastfm_api_key.ok_or_else(|| {
                missing(
                    "LASTFM_API_KEY",
                    "Obtain an API key at https://www.last.fm/api/account/create",
                )
            })?,
            lastfm_user: self
                .lastfm_user
                .ok_or_else(|| missing("LASTFM_USER", "Set the Last.fm user name to sync"))?,
            lastfm_page_size: self.lastfm_page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            notion_token: self.notion_token.ok_or_else(|| {
                missing(
                    "NOTION_TOKEN",
                    "Create an internal integration and share the database with it",
                )
            })?,
            notion_database_id: self.notion_database_id.ok_or_else(|| {
                missing(
                    "NOTION_DATABASE_ID",
                    "Use the id from the database URL",
                )
            })?,
            notion_page_size: self.notion_page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            min_play_count: self.min_play_count.unwrap_or(DEFAULT_MIN_PLAY_COUNT),
            dedupe_within_run: self.dedupe_within_run,
            http_max_attempts: self.http_max_attempts.unwrap_or(1),
            http_timeout: self
                .http_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)),
        };

        config.validate()?;
        Ok(config)
    }
}
