//! Sync status tracking
//!
//! An explicitly constructed status service that the persistence layer updates
//! and the UI layer observes. Clone the tracker to share it; every clone sees
//! the same state and subscriber list.
//!
//! # Examples
//!
//! ```rust
//! use mindmap_core::sync::{SyncState, SyncStatusTracker};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let tracker = SyncStatusTracker::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//! let counter = seen.clone();
//!
//! let subscription = tracker.subscribe(move |_status| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! tracker.mark_syncing();
//! subscription.unsubscribe();
//! tracker.mark_synced();
//!
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! assert_eq!(tracker.status().state, SyncState::Synced);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Coarse persistence state shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    #[default]
    Idle,
    Syncing,
    Synced,
    Offline,
    Error,
}

/// Snapshot handed to subscribers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub state: SyncState,
    pub pending_operations: usize,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

type Listener = Arc<dyn Fn(&SyncStatus) + Send + Sync>;

#[derive(Default)]
struct TrackerInner {
    status: SyncStatus,
    listeners: BTreeMap<u64, Listener>,
    next_id: u64,
}

/// Shared sync status with subscribe/unsubscribe
#[derive(Clone, Default)]
pub struct SyncStatusTracker {
    inner: Arc<Mutex<TrackerInner>>,
}

/// Handle returned by [`SyncStatusTracker::subscribe`]
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    id: u64,
    tracker: Weak<Mutex<TrackerInner>>,
}

impl Subscription {
    /// Stop receiving updates. A no-op if the tracker is gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.tracker.upgrade() {
            lock(&inner).listeners.remove(&self.id);
        }
    }
}

// Poisoning is ignored; the guarded state is plain data
fn lock(inner: &Mutex<TrackerInner>) -> MutexGuard<'_, TrackerInner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SyncStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status snapshot
    pub fn status(&self) -> SyncStatus {
        lock(&self.inner).status.clone()
    }

    /// Register `listener`; it runs after every status change
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SyncStatus) + Send + Sync + 'static,
    {
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, Arc::new(listener));

        Subscription {
            id,
            tracker: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    /// Apply `change` and notify listeners outside the lock
    fn update(&self, change: impl FnOnce(&mut SyncStatus)) {
        let (snapshot, listeners) = {
            let mut inner = lock(&self.inner);
            change(&mut inner.status);
            let listeners: Vec<Listener> = inner.listeners.values().cloned().collect();
            (inner.status.clone(), listeners)
        };

        for listener in listeners {
            listener(&snapshot);
        }
    }

    pub fn mark_syncing(&self) {
        self.update(|s| s.state = SyncState::Syncing);
    }

    pub fn mark_synced(&self) {
        self.update(|s| {
            s.state = SyncState::Synced;
            s.last_synced_at = Some(Utc::now());
            s.last_error = None;
        });
    }

    pub fn mark_offline(&self) {
        self.update(|s| s.state = SyncState::Offline);
    }

    pub fn mark_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|s| {
            s.state = SyncState::Error;
            s.last_error = Some(message);
        });
    }

    pub fn set_pending(&self, pending: usize) {
        self.update(|s| s.pending_operations = pending);
    }
}

impl std::fmt::Debug for SyncStatusTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("SyncStatusTracker")
            .field("status", &inner.status)
            .field("subscribers", &inner.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_initial_status() {
        let tracker = SyncStatusTracker::new();
        let status = tracker.status();

        assert_eq!(status.state, SyncState::Idle);
        assert_eq!(status.pending_operations, 0);
        assert!(status.last_synced_at.is_none());
    }

    #[test]
    fn test_transitions() {
        let tracker = SyncStatusTracker::new();

        tracker.mark_error("boom");
        assert_eq!(tracker.status().state, SyncState::Error);
        assert_eq!(tracker.status().last_error.as_deref(), Some("boom"));

        tracker.mark_synced();
        let status = tracker.status();
        assert_eq!(status.state, SyncState::Synced);
        assert!(status.last_error.is_none());
        assert!(status.last_synced_at.is_some());

        tracker.set_pending(3);
        assert_eq!(tracker.status().pending_operations, 3);
    }

    #[test]
    fn test_subscribers_receive_snapshots() {
        let tracker = SyncStatusTracker::new();
        let seen: Arc<Mutex<Vec<SyncState>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let _subscription = tracker.subscribe(move |status| {
            sink.lock().unwrap().push(status.state);
        });

        tracker.mark_syncing();
        tracker.mark_offline();

        assert_eq!(*seen.lock().unwrap(), vec![SyncState::Syncing, SyncState::Offline]);
    }

    #[test]
    fn test_unsubscribe_stops_updates() {
        let tracker = SyncStatusTracker::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let subscription = tracker.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(tracker.subscriber_count(), 1);

        tracker.mark_syncing();
        subscription.unsubscribe();
        tracker.mark_synced();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.subscriber_count(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let tracker = SyncStatusTracker::new();
        let other = tracker.clone();

        other.mark_offline();

        assert_eq!(tracker.status().state, SyncState::Offline);
    }

    #[test]
    fn test_listener_may_read_tracker() {
        let tracker = SyncStatusTracker::new();
        let observed = Arc::new(Mutex::new(None));
        let reader = tracker.clone();
        let slot = observed.clone();

        let _subscription = tracker.subscribe(move |_| {
            *slot.lock().unwrap() = Some(reader.status().state);
        });

        tracker.mark_syncing();

        assert_eq!(*observed.lock().unwrap(), Some(SyncState::Syncing));
    }

    #[test]
    fn test_unsubscribe_after_tracker_dropped() {
        let tracker = SyncStatusTracker::new();
        let subscription = tracker.subscribe(|_| {});
        drop(tracker);

        subscription.unsubscribe();
    }
}
