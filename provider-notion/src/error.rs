//! Error types for the Notion provider

use thiserror::Error;

/// Notion provider errors
#[derive(Error, Debug)]
pub enum NotionError {
    /// API request returned an error
    #[error("Notion API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse Notion response: {0}")]
    ParseError(String),

    /// Failed to encode a request body
    #[error("Failed to encode Notion request: {0}")]
    Serialization(String),

    /// Transport failure, passed through unchanged
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for Notion operations
pub type Result<T> = std::result::Result<T, NotionError>;

impl From<NotionError> for bridge_traits::error::BridgeError {
    fn from(error: NotionError) -> Self {
        use bridge_traits::error::BridgeError;

        match error {
            NotionError::BridgeError(e) => e,
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}
