//! Node collections
//!
//! The core accepts nodes either as a map keyed by ID or as a flat ordered list.
//! [`NodeLookup`] is the seam traversal needs; [`NodeCollection`] keeps list order
//! and an ID index together so callers can hand over whichever form they hold.

use crate::error::{MindMapError, Result};
use crate::models::Node;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Lookup of nodes by ID
pub trait NodeLookup {
    fn get_node(&self, id: &str) -> Option<&Node>;
}

impl NodeLookup for HashMap<String, Node> {
    fn get_node(&self, id: &str) -> Option<&Node> {
        self.get(id)
    }
}

impl NodeLookup for BTreeMap<String, Node> {
    fn get_node(&self, id: &str) -> Option<&Node> {
        self.get(id)
    }
}

// Linear scan; fine for the small maps a single canvas holds.
impl NodeLookup for [Node] {
    fn get_node(&self, id: &str) -> Option<&Node> {
        self.iter().find(|n| n.id == id)
    }
}

impl NodeLookup for Vec<Node> {
    fn get_node(&self, id: &str) -> Option<&Node> {
        self.as_slice().get_node(id)
    }
}

/// Ordered node list with an ID index
///
/// Duplicate IDs keep the first occurrence.
#[derive(Debug, Clone, Default)]
pub struct NodeCollection {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NodeFile {
    List(Vec<Node>),
    Map(BTreeMap<String, Node>),
}

impl NodeCollection {
    /// Build from a flat list, preserving order
    pub fn from_list(nodes: Vec<Node>) -> Self {
        let mut kept = Vec::with_capacity(nodes.len());
        let mut index = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if index.contains_key(&node.id) {
                tracing::warn!("Duplicate node id {} ignored", node.id);
                continue;
            }
            index.insert(node.id.clone(), kept.len());
            kept.push(node);
        }

        Self { nodes: kept, index }
    }

    /// Build from an ID-keyed map (ordered by key for determinism)
    pub fn from_map<M>(map: M) -> Self
    where
        M: IntoIterator<Item = (String, Node)>,
    {
        let mut entries: Vec<(String, Node)> = map.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self::from_list(entries.into_iter().map(|(_, node)| node).collect())
    }

    /// Parse either a JSON array of nodes or a JSON object keyed by node ID
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: NodeFile = serde_json::from_str(json).map_err(MindMapError::from)?;
        Ok(match file {
            NodeFile::List(nodes) => Self::from_list(nodes),
            NodeFile::Map(map) => Self::from_map(map),
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Like [`get`](Self::get), failing with [`MindMapError::NodeNotFound`]
    pub fn require(&self, id: &str) -> Result<&Node> {
        self.get(id).ok_or_else(|| MindMapError::node_not_found(id))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_vec(self) -> Vec<Node> {
        self.nodes
    }

    /// Direct children of `id`, in collection order
    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.parent_id.as_deref() == Some(id))
    }

    /// Nodes with no parent
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_root())
    }

    /// Copy into an ID-keyed map
    pub fn to_map(&self) -> HashMap<String, Node> {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), n.clone()))
            .collect()
    }
}

impl NodeLookup for NodeCollection {
    fn get_node(&self, id: &str) -> Option<&Node> {
        self.get(id)
    }
}

impl From<Vec<Node>> for NodeCollection {
    fn from(nodes: Vec<Node>) -> Self {
        Self::from_list(nodes)
    }
}

impl From<HashMap<String, Node>> for NodeCollection {
    fn from(map: HashMap<String, Node>) -> Self {
        Self::from_map(map)
    }
}

impl FromIterator<Node> for NodeCollection {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self::from_list(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a NodeCollection {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
