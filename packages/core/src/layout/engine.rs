//! Rank-based tree layout
//!
//! Nodes are assigned a rank equal to their depth from a root and placed along
//! the primary axis by rank. On the secondary axis every leaf takes the next
//! free slot and each parent is centered over its first and last child, so
//! every subtree owns a disjoint interval and same-rank nodes never overlap.
//!
//! Parent links come from `edges` (source → target). Only the first incoming
//! edge of a node counts; nodes caught in a cycle with no real root are laid out
//! as extra roots. Layout never mutates its input.

use crate::error::{MindMapError, Result};
use crate::models::{Edge, Node, NodeSize, Position};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

/// Default node width used for spacing
pub const DEFAULT_NODE_WIDTH: f64 = 250.0;
/// Default node height used for spacing
pub const DEFAULT_NODE_HEIGHT: f64 = 100.0;
/// Default gap between ranks
pub const DEFAULT_RANK_SEPARATION: f64 = 100.0;
/// Default gap between neighbours in a rank
pub const DEFAULT_NODE_SEPARATION: f64 = 50.0;

/// Direction in which depth grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutDirection {
    /// Top to bottom
    #[default]
    #[serde(rename = "TB")]
    TopBottom,
    /// Bottom to top
    #[serde(rename = "BT")]
    BottomTop,
    /// Left to right
    #[serde(rename = "LR")]
    LeftRight,
    /// Right to left
    #[serde(rename = "RL")]
    RightLeft,
}

impl LayoutDirection {
    fn is_horizontal(&self) -> bool {
        matches!(self, LayoutDirection::LeftRight | LayoutDirection::RightLeft)
    }

    fn is_reversed(&self) -> bool {
        matches!(self, LayoutDirection::BottomTop | LayoutDirection::RightLeft)
    }
}

impl fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            LayoutDirection::TopBottom => "TB",
            LayoutDirection::BottomTop => "BT",
            LayoutDirection::LeftRight => "LR",
            LayoutDirection::RightLeft => "RL",
        };
        f.write_str(code)
    }
}

impl FromStr for LayoutDirection {
    type Err = MindMapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "TB" => Ok(LayoutDirection::TopBottom),
            "BT" => Ok(LayoutDirection::BottomTop),
            "LR" => Ok(LayoutDirection::LeftRight),
            "RL" => Ok(LayoutDirection::RightLeft),
            other => Err(MindMapError::invalid_argument(format!(
                "unknown layout direction '{}', expected TB, BT, LR or RL",
                other
            ))),
        }
    }
}

/// Spacing and direction for [`layout`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub direction: LayoutDirection,
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between consecutive ranks
    pub rank_separation: f64,
    /// Gap between neighbours within a rank
    pub node_separation: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::default(),
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            rank_separation: DEFAULT_RANK_SEPARATION,
            node_separation: DEFAULT_NODE_SEPARATION,
        }
    }
}

impl LayoutOptions {
    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn node_size(&self) -> NodeSize {
        NodeSize::new(self.node_width, self.node_height)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.node_width > 0.0 && self.node_height > 0.0) {
            return Err(MindMapError::invalid_config(
                "layout node size must be positive",
            ));
        }
        if !(self.rank_separation >= 0.0 && self.node_separation >= 0.0) {
            return Err(MindMapError::invalid_config(
                "layout separations cannot be negative",
            ));
        }
        Ok(())
    }

    /// Extent of a node along the rank axis
    fn primary_extent(&self) -> f64 {
        if self.direction.is_horizontal() {
            self.node_width
        } else {
            self.node_height
        }
    }

    /// Extent of a node along the sibling axis
    fn secondary_extent(&self) -> f64 {
        if self.direction.is_horizontal() {
            self.node_height
        } else {
            self.node_width
        }
    }

    fn to_position(&self, rank: usize, secondary: f64) -> Position {
        let mut primary = rank as f64 * (self.primary_extent() + self.rank_separation);
        if self.direction.is_reversed() {
            primary = -primary;
        }

        if self.direction.is_horizontal() {
            Position::new(primary, secondary)
        } else {
            Position::new(secondary, primary)
        }
    }
}

/// Laid-out nodes plus the untouched edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl LayoutResult {
    /// Position of every node keyed by ID, ready to merge into the store
    pub fn positions(&self) -> HashMap<String, Position> {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), n.position))
            .collect()
    }
}

/// Compute fresh positions for every node, ignoring manual placement.
fn compute_positions(
    nodes: &[Node],
    edges: &[Edge],
    options: &LayoutOptions,
) -> HashMap<String, Position> {
    let count = nodes.len();
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(count);
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node.id.as_str()).or_insert(i);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut has_parent = vec![false; count];
    for edge in edges {
        let (Some(&source), Some(&target)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) else {
            continue;
        };
        if source == target || has_parent[target] {
            continue;
        }
        has_parent[target] = true;
        children[source].push(target);
    }

    let step = options.secondary_extent() + options.node_separation;
    let mut rank = vec![0usize; count];
    let mut secondary = vec![0.0f64; count];
    let mut visited = vec![false; count];
    let mut tree_children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut cursor = 0.0f64;

    let roots = (0..count).filter(|&i| !has_parent[i]);
    let leftovers = 0..count;

    for start in roots.chain(leftovers) {
        if visited[start] {
            continue;
        }
        if has_parent[start] {
            tracing::warn!(
                "Node {} is part of a parent cycle; laying it out as a root",
                nodes[start].id
            );
        }

        visited[start] = true;
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            if frame.1 < children[node].len() {
                let child = children[node][frame.1];
                frame.1 += 1;
                if visited[child] {
                    continue;
                }
                visited[child] = true;
                rank[child] = rank[node] + 1;
                tree_children[node].push(child);
                stack.push((child, 0));
            } else {
                stack.pop();
                match (tree_children[node].first(), tree_children[node].last()) {
                    (Some(&first), Some(&last)) => {
                        secondary[node] = (secondary[first] + secondary[last]) / 2.0;
                    }
                    _ => {
                        secondary[node] = cursor;
                        cursor += step;
                    }
                }
            }
        }
    }

    nodes
        .iter()
        .enumerate()
        .filter(|(i, node)| index.get(node.id.as_str()) == Some(i))
        .map(|(i, node)| (node.id.clone(), options.to_position(rank[i], secondary[i])))
        .collect()
}

/// Lay out a tree.
///
/// Manually positioned nodes keep their coordinates; every other node gets a
/// fresh position. Returns new values and leaves the inputs untouched.
pub fn layout(nodes: &[Node], edges: &[Edge], options: &LayoutOptions) -> LayoutResult {
    if nodes.is_empty() {
        return LayoutResult {
            nodes: Vec::new(),
            edges: edges.to_vec(),
        };
    }

    let computed = compute_positions(nodes, edges, options);

    let laid_out: Vec<Node> = nodes
        .iter()
        .map(|node| {
            let mut node = node.clone();
            if !node.manually_positioned {
                if let Some(position) = computed.get(&node.id) {
                    node.position = *position;
                }
            }
            node
        })
        .collect();

    tracing::debug!(
        "Laid out {} nodes ({} direction)",
        laid_out.len(),
        options.direction
    );

    LayoutResult {
        nodes: laid_out,
        edges: edges.to_vec(),
    }
}

/// IDs of `anchor_id` and its descendants.
///
/// Follows the same tree edges as [`compute_positions`]: the first incoming
/// edge of each node between known nodes, ignoring self loops.
fn collect_subtree<'a>(
    anchor_id: &'a str,
    nodes: &'a [Node],
    edges: &'a [Edge],
) -> HashSet<&'a str> {
    let known: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut has_parent: HashSet<&str> = HashSet::new();
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        let (source, target) = (edge.source.as_str(), edge.target.as_str());
        if source == target || !known.contains(source) || !known.contains(target) {
            continue;
        }
        if has_parent.insert(target) {
            adjacency.entry(source).or_default().push(target);
        }
    }

    let mut subtree: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    subtree.insert(anchor_id);
    queue.push_back(anchor_id);

    while let Some(current) = queue.pop_front() {
        for &child in adjacency.get(current).into_iter().flatten() {
            if subtree.insert(child) {
                queue.push_back(child);
            }
        }
    }

    subtree
}

/// Re-layout only the descendants of `anchor_id`, holding the anchor fixed.
///
/// The induced subtree is laid out on its own, then translated so the anchor's
/// fresh position lands back on its current one. Nodes outside the subtree and
/// manually positioned nodes are untouched. An unknown anchor returns the input
/// unchanged.
pub fn layout_descendants(
    anchor_id: &str,
    nodes: &[Node],
    edges: &[Edge],
    options: &LayoutOptions,
) -> LayoutResult {
    let Some(anchor) = nodes.iter().find(|n| n.id == anchor_id) else {
        tracing::warn!("Layout anchor {} not found; nothing to do", anchor_id);
        return LayoutResult {
            nodes: nodes.to_vec(),
            edges: edges.to_vec(),
        };
    };

    let subtree = collect_subtree(anchor_id, nodes, edges);

    let sub_nodes: Vec<Node> = nodes
        .iter()
        .filter(|n| subtree.contains(n.id.as_str()))
        .cloned()
        .collect();
    // Edges back into the anchor would stop it acting as the subtree root
    let sub_edges: Vec<Edge> = edges
        .iter()
        .filter(|e| {
            e.target != anchor_id
                && subtree.contains(e.source.as_str())
                && subtree.contains(e.target.as_str())
        })
        .cloned()
        .collect();

    let computed = compute_positions(&sub_nodes, &sub_edges, options);
    let (dx, dy) = match computed.get(anchor_id) {
        Some(fresh) => (anchor.position.x - fresh.x, anchor.position.y - fresh.y),
        None => (0.0, 0.0),
    };

    let laid_out: Vec<Node> = nodes
        .iter()
        .map(|node| {
            let mut node = node.clone();
            if node.id != anchor_id
                && !node.manually_positioned
                && subtree.contains(node.id.as_str())
            {
                if let Some(position) = computed.get(&node.id) {
                    node.position = position.translated(dx, dy);
                }
            }
            node
        })
        .collect();

    tracing::debug!(
        "Re-laid {} descendants of {}",
        subtree.len().saturating_sub(1),
        anchor_id
    );

    LayoutResult {
        nodes: laid_out,
        edges: edges.to_vec(),
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;
