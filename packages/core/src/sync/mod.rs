//! Persistence Sync
//!
//! - [`status`] - Observable sync state shared between persistence and UI
//! - [`queue`] - Ordered offline write queue with exponential backoff

pub mod queue;
pub mod status;

pub use queue::{
    FlushReport, OfflineQueue, PendingOperation, PersistenceSink, QueuedOperation, RetryPolicy,
    SinkError,
};
pub use status::{Subscription, SyncState, SyncStatus, SyncStatusTracker};
