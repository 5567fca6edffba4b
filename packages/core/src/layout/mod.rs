//! Layout Engine
//!
//! Computes non-overlapping canvas positions for a mind-map tree.
//!
//! - [`engine`] - Rank-based tree layout, whole-tree and anchored subtree
//! - [`geometry`] - Overlap tests and bounding boxes
//!
//! # Examples
//!
//! ```rust
//! use mindmap_core::layout::{layout, LayoutDirection, LayoutOptions};
//! use mindmap_core::models::{edges_from_parent_links, Node, NodeType};
//!
//! let nodes = vec![
//!     Node::new_with_id("r".into(), NodeType::Root, "Root".into(), None),
//!     Node::new_with_id("a".into(), NodeType::User, "A".into(), Some("r".into())),
//! ];
//! let edges = edges_from_parent_links(&nodes);
//! let options = LayoutOptions::default().with_direction(LayoutDirection::LeftRight);
//!
//! let result = layout(&nodes, &edges, &options);
//! let positions = result.positions();
//! assert!(positions["a"].x > positions["r"].x);
//! ```

pub mod engine;
pub mod geometry;

pub use engine::{
    layout, layout_descendants, LayoutDirection, LayoutOptions, LayoutResult,
    DEFAULT_NODE_HEIGHT, DEFAULT_NODE_SEPARATION, DEFAULT_NODE_WIDTH, DEFAULT_RANK_SEPARATION,
};
pub use geometry::{bounding_box, has_overlaps, nodes_overlap, rects_overlap, BoundingBox};
