use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Failure of one remote call during a sync run
///
/// None of these abort a run; they end a pagination loop or mark a single
/// entry as failed.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Album catalog request failed: {0}")]
    Source(#[source] BridgeError),

    #[error("Record store request failed: {0}")]
    Destination(#[source] BridgeError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
