//! Error types for the Last.fm provider

use thiserror::Error;

/// Last.fm provider errors
#[derive(Error, Debug)]
pub enum LastFmError {
    /// HTTP request returned a non-success status
    #[error("Last.fm API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Last.fm answered with its own error payload
    #[error("Last.fm error {code}: {message}")]
    RemoteApi { code: i64, message: String },

    /// Failed to parse API response
    #[error("Failed to parse Last.fm response: {0}")]
    ParseError(String),

    /// Transport failure, passed through unchanged
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for Last.fm operations
pub type Result<T> = std::result::Result<T, LastFmError>;

impl From<LastFmError> for bridge_traits::error::BridgeError {
    fn from(error: LastFmError) -> Self {
        use bridge_traits::error::BridgeError;

        match error {
            LastFmError::BridgeError(e) => e,
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}
