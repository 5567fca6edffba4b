//! Bounding-box utilities over laid-out nodes
//!
//! Positions are top-left corners and every node shares one [`NodeSize`].

use crate::models::{Node, NodeSize, Position};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Two boxes of `size` at `a` and `b` overlap. Touching edges do not count.
pub fn rects_overlap(a: Position, b: Position, size: NodeSize) -> bool {
    a.x < b.x + size.width
        && a.x + size.width > b.x
        && a.y < b.y + size.height
        && a.y + size.height > b.y
}

/// Node boxes overlap (adjacency is not overlap)
pub fn nodes_overlap(a: &Node, b: &Node, size: NodeSize) -> bool {
    rects_overlap(a.position, b.position, size)
}

/// Any pair of nodes overlaps
pub fn has_overlaps(nodes: &[Node], size: NodeSize) -> bool {
    nodes.iter().enumerate().any(|(i, a)| {
        nodes[i + 1..]
            .iter()
            .any(|b| nodes_overlap(a, b, size))
    })
}

/// Smallest box containing every node; zero-size at the origin when empty
pub fn bounding_box(nodes: &[Node], size: NodeSize) -> BoundingBox {
    if nodes.is_empty() {
        return BoundingBox::default();
    }

    let (min_x, min_y, max_x, max_y) = nodes.iter().fold(
        (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        |(min_x, min_y, max_x, max_y), node| {
            (
                min_x.min(node.position.x),
                min_y.min(node.position.y),
                max_x.max(node.position.x + size.width),
                max_y.max(node.position.y + size.height),
            )
        },
    );

    BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}
