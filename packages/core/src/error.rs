//! Error Types
//!
//! Corrupt tree data (cycles, dangling parents) is never an error in this crate:
//! traversal and export degrade to partial results with a diagnostic. Errors are
//! reserved for caller contract violations, bad configuration and I/O at the
//! edges.

use thiserror::Error;

/// Errors surfaced by the mind-map core
#[derive(Error, Debug)]
pub enum MindMapError {
    /// Caller passed an argument that violates the operation's contract
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Node not found by ID
    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MindMapError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a node not found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }
}

pub type Result<T> = std::result::Result<T, MindMapError>;
