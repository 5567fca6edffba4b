//! Offline persistence queue with exponential backoff
//!
//! Pending writes accumulate while the persistence collaborator is unreachable
//! and are replayed in order by [`OfflineQueue::flush`].
//!
//! # Retry Behavior
//!
//! - **Offline**: Flush stops immediately; the operation stays queued and its
//!   retry count is untouched
//! - **Failed**: Retried after `base_delay × 2^retry_count` until `max_retries`,
//!   then dropped with an error diagnostic
//! - **Ordering**: Operations are applied strictly in enqueue order; a failing
//!   operation blocks the ones behind it

use crate::error::{MindMapError, Result};
use crate::models::{Node, Position};
use crate::sync::status::SyncStatusTracker;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;
use tokio::time::Duration;
use uuid::Uuid;

/// Errors reported by a [`PersistenceSink`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// Backend unreachable; retry when connectivity returns
    #[error("Persistence backend is offline")]
    Offline,

    /// Backend rejected or failed the write
    #[error("Persistence failed: {0}")]
    Failed(String),
}

/// A write waiting to reach the persistence backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PendingOperation {
    /// Create or replace a node
    UpsertNode { node: Node },
    /// Delete a node by ID
    DeleteNode {
        #[serde(rename = "nodeId")]
        node_id: String,
    },
    /// Merge a batch of positions
    UpdatePositions { positions: HashMap<String, Position> },
}

/// Queue entry with retry bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedOperation {
    pub id: Uuid,
    pub operation: PendingOperation,
    pub retry_count: u32,
    pub enqueued_at: DateTime<Utc>,
}

/// The external persistence collaborator
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    async fn apply(&self, operation: &PendingOperation) -> std::result::Result<(), SinkError>;
}

/// Backoff configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    pub base_delay_ms: u64,
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: 1000,
            max_retries: 5,
        }
    }
}

impl RetryPolicy {
    /// `base_delay × 2^retry_count`, saturating
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mindmap_core::sync::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy { base_delay_ms: 100, max_retries: 3 };
    /// assert_eq!(policy.backoff_delay(0), Duration::from_millis(100));
    /// assert_eq!(policy.backoff_delay(3), Duration::from_millis(800));
    /// ```
    pub fn backoff_delay(&self, retry_count: u32) -> Duration {
        let factor = 2u64.checked_pow(retry_count).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_delay_ms == 0 {
            return Err(MindMapError::invalid_config(
                "retry.baseDelayMs must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Outcome of a flush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushReport {
    pub applied: usize,
    pub dropped: usize,
    pub remaining: usize,
}

/// Ordered queue of pending writes
#[derive(Debug)]
pub struct OfflineQueue {
    operations: VecDeque<QueuedOperation>,
    policy: RetryPolicy,
    tracker: SyncStatusTracker,
}

impl OfflineQueue {
    pub fn new(policy: RetryPolicy, tracker: SyncStatusTracker) -> Self {
        Self {
            operations: VecDeque::new(),
            policy,
            tracker,
        }
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = &QueuedOperation> {
        self.operations.iter()
    }

    /// Queue `operation`, returning its queue ID.
    ///
    /// A position update directly behind another position update that has not
    /// been attempted yet is merged into it.
    pub fn enqueue(&mut self, operation: PendingOperation) -> Uuid {
        if let PendingOperation::UpdatePositions { positions } = &operation {
            if let Some(QueuedOperation {
                id,
                operation: PendingOperation::UpdatePositions { positions: queued },
                retry_count: 0,
                ..
            }) = self.operations.back_mut()
            {
                queued.extend(positions.iter().map(|(k, v)| (k.clone(), *v)));
                return *id;
            }
        }

        let id = Uuid::new_v4();
        self.operations.push_back(QueuedOperation {
            id,
            operation,
            retry_count: 0,
            enqueued_at: Utc::now(),
        });
        self.tracker.set_pending(self.operations.len());
        id
    }

    /// Replay queued operations against `sink` in order.
    pub async fn flush(&mut self, sink: &dyn PersistenceSink) -> FlushReport {
        let mut report = FlushReport::default();
        if self.operations.is_empty() {
            return report;
        }

        self.tracker.mark_syncing();

        while let Some(front) = self.operations.front_mut() {
            match sink.apply(&front.operation).await {
                Ok(()) => {
                    if front.retry_count > 0 {
                        tracing::debug!(
                            "Operation {} succeeded after {} retry(ies)",
                            front.id,
                            front.retry_count
                        );
                    }
                    self.operations.pop_front();
                    report.applied += 1;
                    self.tracker.set_pending(self.operations.len());
                }
                Err(SinkError::Offline) => {
                    tracing::debug!(
                        "Persistence offline; {} operation(s) stay queued",
                        self.operations.len()
                    );
                    self.tracker.mark_offline();
                    report.remaining = self.operations.len();
                    return report;
                }
                Err(SinkError::Failed(message)) => {
                    if front.retry_count >= self.policy.max_retries {
                        tracing::error!(
                            "Dropping operation {} after {} retries: {}",
                            front.id,
                            front.retry_count,
                            message
                        );
                        self.operations.pop_front();
                        report.dropped += 1;
                        self.tracker.mark_error(message);
                        self.tracker.set_pending(self.operations.len());
                        continue;
                    }

                    let delay = self.policy.backoff_delay(front.retry_count);
                    front.retry_count += 1;
                    tracing::warn!(
                        "Operation {} failed ({}), retry {}/{} in {:?}",
                        front.id,
                        message,
                        front.retry_count,
                        self.policy.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        if report.dropped == 0 {
            self.tracker.mark_synced();
        }
        report.remaining = self.operations.len();
        report
    }
}

#[cfg(test)]
#[path = "queue_test.rs"]
mod queue_test;
