//! Data Models
//!
//! This module contains the plain values the tree algorithms consume and produce:
//!
//! - `Node` - A mind-map node linked to its parent by ID
//! - `Edge` - A drawn parent → child link, used by layout
//! - `ContextEntry` - A node projected into a conversation path
//! - `NodeCollection` / `NodeLookup` - Flat-list and map forms of a node set

mod collection;
mod node;

pub use collection::{NodeCollection, NodeLookup};
pub use node::{
    edges_from_parent_links, ContextEntry, Edge, Node, NodeSize, NodeType, Position,
};
