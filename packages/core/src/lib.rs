//! MindMap Core Tree Algorithms
//!
//! This crate provides the data-shaping layer behind a conversational mind-map:
//! each node is a chat turn linked to its parent, and branching the tree forks
//! the conversation.
//!
//! # Architecture
//!
//! - **Pure functions**: Context assembly, prompt building, layout and export
//!   take node collections by reference and return fresh values
//! - **Untrusted links**: Parent pointers may dangle or loop; every traversal is
//!   bounded and degrades to a partial result instead of failing
//! - **Explicit services**: Sync status and the offline queue are constructed by
//!   the caller, never global
//!
//! # Modules
//!
//! - [`models`] - Node, Edge, ContextEntry and node collections
//! - [`context`] - Ancestor traversal and token-budgeted prompts
//! - [`layout`] - Non-overlapping canvas positions
//! - [`export`] - Markdown export and filenames
//! - [`sync`] - Sync status observation and offline write queue
//! - [`config`] - Engine-wide configuration

pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod layout;
pub mod models;
pub mod sync;

// Re-export commonly used types
pub use config::{EngineConfig, TraversalOptions};
pub use context::{
    assemble_context, build_prompt, build_selection_prompt, estimate_tokens, trace_ancestors,
    validate_path, PromptOptions, PromptResult,
};
pub use error::{MindMapError, Result};
pub use export::{export_branch, export_filename, export_tree, ExportOptions, ExportResult};
pub use layout::{layout, layout_descendants, LayoutDirection, LayoutOptions, LayoutResult};
pub use models::*;
pub use sync::{OfflineQueue, PersistenceSink, RetryPolicy, SyncState, SyncStatus, SyncStatusTracker};
