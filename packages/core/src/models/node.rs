//! Node Data Structures
//!
//! This module defines the core `Node` struct and the small value types the
//! tree algorithms operate on.
//!
//! # Architecture
//!
//! - **Flat collection**: Nodes live in a flat list; the tree is expressed only
//!   through `parent_id` pointers (exactly one `None` per connected tree)
//! - **Authorship types**: `root` is structural, `user` / `ai` record who wrote
//!   the content
//! - **Pure values**: Nodes are passed by value into the core and derived values
//!   (context lists, positions, markdown) are returned; nothing here mutates the
//!   authoritative store
//!
//! # Examples
//!
//! ```rust
//! use mindmap_core::models::{Node, NodeType};
//!
//! let root = Node::new(NodeType::Root, "Why is the sky blue?".to_string(), None);
//! let answer = Node::new(
//!     NodeType::Ai,
//!     "Rayleigh scattering.".to_string(),
//!     Some(root.id.clone()),
//! );
//!
//! assert!(root.is_root());
//! assert_eq!(answer.parent_id.as_deref(), Some(root.id.as_str()));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Who authored a node's content.
///
/// Serialized lowercase (`"root"`, `"user"`, `"ai"`) to match the stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Structural root of a map
    Root,
    /// Content written by the user
    User,
    /// Content generated by the AI collaborator
    Ai,
}

impl NodeType {
    /// Speaker label used in prompt transcripts
    pub fn label(&self) -> &'static str {
        match self {
            NodeType::Root => "Root",
            NodeType::User => "User",
            NodeType::Ai => "Assistant",
        }
    }

    /// Glyph prefixed to exported headings (root nodes are unmarked)
    pub fn glyph(&self) -> Option<&'static str> {
        match self {
            NodeType::Root => None,
            NodeType::User => Some("👤"),
            NodeType::Ai => Some("🤖"),
        }
    }

    /// Wire name (`root`, `user`, `ai`)
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Root => "root",
            NodeType::User => "user",
            NodeType::Ai => "ai",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 2-D canvas coordinate of a node's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Shift by `(dx, dy)`
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Bounding box size of a rendered node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeSize {
    pub width: f64,
    pub height: f64,
}

impl NodeSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A single mind-map node.
///
/// # Fields
///
/// - `id`: Opaque unique identifier (UUID for generated nodes)
/// - `parent_id`: Parent node reference, `None` marks the root
/// - `node_type`: Authorship type, serialized as `type`
/// - `content`: Freeform text, the unit of context assembly
/// - `selection_source`: Text excerpted from an ancestor that spawned this branch
/// - `position`: Canvas coordinate, updated by layout or manual drag
/// - `manually_positioned`: When set, layout keeps `position` untouched
/// - `created_at` / `updated_at`: Informational timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier
    pub id: String,

    /// Parent node ID (`None` means this node is the root)
    pub parent_id: Option<String>,

    /// Authorship type
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Freeform content
    pub content: String,

    /// Text selected in an ancestor that motivated this branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_source: Option<String>,

    /// Canvas position (top-left corner)
    #[serde(default)]
    pub position: Position,

    /// Set when the user dragged the node; layout must not move it
    #[serde(default)]
    pub manually_positioned: bool,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Create a new Node with auto-generated UUID
    ///
    /// # Arguments
    ///
    /// * `node_type` - Authorship type
    /// * `content` - Node text
    /// * `parent_id` - Parent reference, `None` for a root
    pub fn new(node_type: NodeType, content: String, parent_id: Option<String>) -> Self {
        Self::new_with_id(Uuid::new_v4().to_string(), node_type, content, parent_id)
    }

    /// Create a new Node with an explicit ID
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use mindmap_core::models::{Node, NodeType};
    /// let node = Node::new_with_id(
    ///     "root".to_string(),
    ///     NodeType::Root,
    ///     "Project ideas".to_string(),
    ///     None,
    /// );
    /// assert_eq!(node.id, "root");
    /// ```
    pub fn new_with_id(
        id: String,
        node_type: NodeType,
        content: String,
        parent_id: Option<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            parent_id,
            node_type,
            content,
            selection_source: None,
            position: Position::default(),
            manually_positioned: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the canvas position
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    /// Attach the ancestor excerpt that spawned this branch
    pub fn with_selection_source(mut self, selection: impl Into<String>) -> Self {
        self.selection_source = Some(selection.into());
        self
    }

    /// Pin the node at `(x, y)` so layout leaves it alone
    pub fn with_manual_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self.manually_positioned = true;
        self
    }

    /// Check if this node is a root (no parent)
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Content is empty after trimming
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Directed link from parent (`source`) to child (`target`) as drawn on the canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    /// Edge between two node IDs with a deterministic ID (`e-{source}-{target}`)
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("e-{}-{}", source, target),
            source,
            target,
        }
    }
}

/// Derive one edge per node whose parent is present in `nodes`.
///
/// Dangling parent references produce no edge, so the result only links
/// nodes that can actually be drawn.
pub fn edges_from_parent_links(nodes: &[Node]) -> Vec<Edge> {
    let ids: std::collections::HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    nodes
        .iter()
        .filter_map(|node| {
            node.parent_id
                .as_deref()
                .filter(|parent| ids.contains(parent))
                .map(|parent| Edge::between(parent, node.id.as_str()))
        })
        .collect()
}

/// One step of a conversation path, projected from a [`Node`].
///
/// This is the exact shape sent as the body of an outbound generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextEntry {
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_source: Option<String>,
}

impl From<&Node> for ContextEntry {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            content: node.content.clone(),
            node_type: node.node_type,
            selection_source: node.selection_source.clone(),
        }
    }
}
