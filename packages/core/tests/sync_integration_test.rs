//! Sync Integration Tests
//!
//! Exercises the offline queue against an in-memory store whose connectivity
//! can be toggled, observing status changes the way a UI indicator would.

#[cfg(test)]
mod sync_integration_tests {
    use async_trait::async_trait;
    use mindmap_core::models::{Node, NodeType, Position};
    use mindmap_core::sync::{
        OfflineQueue, PendingOperation, PersistenceSink, RetryPolicy, SinkError, SyncState,
        SyncStatusTracker,
    };
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-memory node store with a connectivity switch
    #[derive(Default)]
    struct MemoryStore {
        offline: AtomicBool,
        nodes: Mutex<HashMap<String, Node>>,
    }

    impl MemoryStore {
        fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        fn snapshot(&self) -> HashMap<String, Node> {
            self.nodes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PersistenceSink for MemoryStore {
        async fn apply(&self, operation: &PendingOperation) -> Result<(), SinkError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(SinkError::Offline);
            }

            let mut nodes = self.nodes.lock().unwrap();
            match operation {
                PendingOperation::UpsertNode { node } => {
                    nodes.insert(node.id.clone(), node.clone());
                }
                PendingOperation::DeleteNode { node_id } => {
                    nodes.remove(node_id);
                }
                PendingOperation::UpdatePositions { positions } => {
                    for (id, position) in positions {
                        let node = nodes
                            .get_mut(id)
                            .ok_or_else(|| SinkError::Failed(format!("unknown node {}", id)))?;
                        node.position = *position;
                    }
                }
            }
            Ok(())
        }
    }

    fn node(id: &str, parent: Option<&str>) -> Node {
        let node_type = if parent.is_none() {
            NodeType::Root
        } else {
            NodeType::User
        };
        Node::new_with_id(id.to_string(), node_type, id.to_string(), parent.map(String::from))
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            base_delay_ms: 1,
            max_retries: 1,
        }
    }

    fn record_states(tracker: &SyncStatusTracker) -> Arc<Mutex<Vec<SyncState>>> {
        let states = Arc::new(Mutex::new(Vec::new()));
        let sink = states.clone();
        // Dropping the handle leaves the listener registered
        let _subscription = tracker.subscribe(move |status| {
            let mut seen = sink.lock().unwrap();
            if seen.last() != Some(&status.state) {
                seen.push(status.state);
            }
        });
        states
    }

    #[tokio::test]
    async fn test_offline_session_replays_on_reconnect() {
        let store = MemoryStore::default();
        let tracker = SyncStatusTracker::new();
        let states = record_states(&tracker);
        let mut queue = OfflineQueue::new(policy(), tracker.clone());

        store.set_offline(true);
        queue.enqueue(PendingOperation::UpsertNode {
            node: node("root", None),
        });
        queue.enqueue(PendingOperation::UpsertNode {
            node: node("child", Some("root")),
        });
        queue.enqueue(PendingOperation::UpdatePositions {
            positions: HashMap::from([("root".to_string(), Position::new(10.0, 20.0))]),
        });
        queue.enqueue(PendingOperation::UpdatePositions {
            positions: HashMap::from([("child".to_string(), Position::new(10.0, 220.0))]),
        });

        let report = queue.flush(&store).await;
        assert_eq!(report.applied, 0);
        assert_eq!(report.remaining, 3);
        assert!(store.snapshot().is_empty());
        assert_eq!(tracker.status().pending_operations, 3);

        store.set_offline(false);
        let report = queue.flush(&store).await;
        assert_eq!(report.applied, 3);
        assert!(queue.is_empty());

        let saved = store.snapshot();
        assert_eq!(saved["root"].position, Position::new(10.0, 20.0));
        assert_eq!(saved["child"].position, Position::new(10.0, 220.0));

        let status = tracker.status();
        assert_eq!(status.state, SyncState::Synced);
        assert_eq!(status.pending_operations, 0);
        assert!(status.last_synced_at.is_some());

        assert_eq!(
            *states.lock().unwrap(),
            vec![
                SyncState::Idle,
                SyncState::Syncing,
                SyncState::Offline,
                SyncState::Syncing,
                SyncState::Synced,
            ]
        );
    }

    #[tokio::test]
    async fn test_rejected_write_does_not_block_queue() {
        let store = MemoryStore::default();
        let tracker = SyncStatusTracker::new();
        let mut queue = OfflineQueue::new(policy(), tracker.clone());

        queue.enqueue(PendingOperation::UpdatePositions {
            positions: HashMap::from([("ghost".to_string(), Position::new(0.0, 0.0))]),
        });
        queue.enqueue(PendingOperation::UpsertNode {
            node: node("root", None),
        });

        let report = queue.flush(&store).await;

        assert_eq!(report.dropped, 1);
        assert_eq!(report.applied, 1);
        assert!(store.snapshot().contains_key("root"));

        let status = tracker.status();
        assert_eq!(status.state, SyncState::Error);
        assert_eq!(status.last_error.as_deref(), Some("unknown node ghost"));
    }

    #[test]
    fn test_delete_after_upsert_leaves_store_empty() {
        let store = MemoryStore::default();
        let mut queue = OfflineQueue::new(policy(), SyncStatusTracker::new());

        queue.enqueue(PendingOperation::UpsertNode {
            node: node("root", None),
        });
        queue.enqueue(PendingOperation::DeleteNode {
            node_id: "root".to_string(),
        });

        let report = tokio_test::block_on(queue.flush(&store));

        assert_eq!(report.applied, 2);
        assert!(store.snapshot().is_empty());
    }
}
