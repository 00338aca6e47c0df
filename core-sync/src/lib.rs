//! # Album Sync Module
//!
//! Copies a listener's top albums from an `AlbumCatalog` into a `RecordStore`,
//! creating one record per qualifying album that the store does not already
//! hold.
//!
//! ## Components
//!
//! - **Source Reader** (`source`): Walks the catalog page by page
//! - **Destination Index** (`index`): Snapshots the (album, artist) keys already stored
//! - **Sync Driver** (`driver`): Filters, transforms and creates records entry by entry
//! - **Sync Coordinator** (`coordinator`): Runs the three in order and reports a summary
//!
//! ## Failure model
//!
//! Nothing here is fatal. A failed page ends that pagination loop with the
//! data gathered so far; a failed create is counted and the run moves on.

pub mod coordinator;
pub mod driver;
pub mod error;
pub mod index;
pub mod source;

pub use coordinator::SyncCoordinator;
pub use driver::{
    EntryOutcome, SkipReason, SyncDriver, SyncOptions, SyncSummary, UNKNOWN_ALBUM, UNKNOWN_ARTIST,
};
pub use error::{Result, SyncError};
pub use index::{DestinationIndex, IndexSnapshot};
pub use source::SourceReader;
