//! Ancestor traversal
//!
//! Walks a node's parent chain and returns the conversation path root-first.
//! Parent pointers come from user data and are never trusted: a visited set stops
//! cycles, a missing parent ends the walk at the orphan, and a hard depth ceiling
//! bounds pathological input. None of these are errors.

use crate::models::{ContextEntry, NodeLookup};
use std::collections::{HashSet, VecDeque};

/// Iteration ceiling for a single traversal
pub const MAX_TRAVERSAL_DEPTH: usize = 1000;

/// Why a traversal stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraversalStop {
    /// Starting node does not exist
    StartNotFound,
    /// Reached a node with no parent
    ReachedRoot,
    /// Next parent was already visited
    Cycle { at: String },
    /// Next parent is absent from the collection
    MissingParent { parent_id: String },
    /// Ceiling reached before a root
    DepthLimit,
}

/// Result of walking a node's ancestors
#[derive(Debug, Clone)]
pub struct AncestorTrace {
    /// Root-first path ending at the starting node
    pub entries: Vec<ContextEntry>,
    pub stop: TraversalStop,
}

impl AncestorTrace {
    /// Whether the walk ended at a genuine root
    pub fn is_complete(&self) -> bool {
        self.stop == TraversalStop::ReachedRoot
    }
}

/// Walk from `node_id` up to its root, collecting at most `max_depth` entries.
pub fn trace_ancestors<L>(node_id: &str, nodes: &L, max_depth: usize) -> AncestorTrace
where
    L: NodeLookup + ?Sized,
{
    let Some(mut current) = nodes.get_node(node_id) else {
        return AncestorTrace {
            entries: Vec::new(),
            stop: TraversalStop::StartNotFound,
        };
    };

    let mut path: VecDeque<ContextEntry> = VecDeque::new();
    let mut visited: HashSet<&str> = HashSet::new();

    let stop = loop {
        if path.len() >= max_depth {
            tracing::warn!(
                "Context traversal from {} hit the depth ceiling of {}; returning partial path",
                node_id,
                max_depth
            );
            break TraversalStop::DepthLimit;
        }

        visited.insert(current.id.as_str());
        path.push_front(ContextEntry::from(current));

        let Some(parent_id) = current.parent_id.as_deref() else {
            break TraversalStop::ReachedRoot;
        };

        if visited.contains(parent_id) {
            tracing::warn!(
                "Cycle detected in parent chain of {} at {}; returning partial path",
                node_id,
                parent_id
            );
            break TraversalStop::Cycle {
                at: parent_id.to_string(),
            };
        }

        match nodes.get_node(parent_id) {
            Some(parent) => current = parent,
            None => {
                tracing::warn!(
                    "Node {} references missing parent {}; treating it as the root",
                    current.id,
                    parent_id
                );
                break TraversalStop::MissingParent {
                    parent_id: parent_id.to_string(),
                };
            }
        }
    };

    AncestorTrace {
        entries: path.into(),
        stop,
    }
}

/// Build the root-first conversation path ending at `node_id`.
///
/// Returns an empty list when the node does not exist.
///
/// # Examples
///
/// ```rust
/// use mindmap_core::context::assemble_context;
/// use mindmap_core::models::{Node, NodeType};
///
/// let nodes = vec![
///     Node::new_with_id("r".into(), NodeType::Root, "Topic".into(), None),
///     Node::new_with_id("q".into(), NodeType::User, "Question".into(), Some("r".into())),
/// ];
///
/// let path = assemble_context("q", &nodes);
/// assert_eq!(path.len(), 2);
/// assert_eq!(path[0].id, "r");
/// ```
pub fn assemble_context<L>(node_id: &str, nodes: &L) -> Vec<ContextEntry>
where
    L: NodeLookup + ?Sized,
{
    trace_ancestors(node_id, nodes, MAX_TRAVERSAL_DEPTH).entries
}

/// Check a previously assembled path against the current collection.
///
/// The first entry must be a parentless node and every later entry's parent
/// must be the entry before it. An empty path is not well-formed.
pub fn validate_path<L>(path: &[ContextEntry], nodes: &L) -> bool
where
    L: NodeLookup + ?Sized,
{
    let Some(first) = path.first() else {
        return false;
    };

    match nodes.get_node(&first.id) {
        Some(node) if node.parent_id.is_none() => {}
        _ => return false,
    }

    path.windows(2).all(|pair| {
        nodes
            .get_node(&pair[1].id)
            .is_some_and(|node| node.parent_id.as_deref() == Some(pair[0].id.as_str()))
    })
}
