//! Engine configuration
//!
//! One document groups the tunables of every module. Each section falls back
//! to its defaults when omitted, so `{}` is a valid configuration.
//!
//! ```json
//! {
//!   "traversal": { "maxDepth": 1000 },
//!   "prompt": { "tokenLimit": 8000 },
//!   "layout": { "direction": "LR", "nodeWidth": 250, "nodeHeight": 100 },
//!   "export": { "includeNodeTypes": true },
//!   "retry": { "baseDelayMs": 1000, "maxRetries": 5 }
//! }
//! ```

use crate::context::{PromptOptions, MAX_TRAVERSAL_DEPTH};
use crate::error::{MindMapError, Result};
use crate::export::ExportOptions;
use crate::layout::LayoutOptions;
use crate::sync::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ancestor traversal limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TraversalOptions {
    /// Ceiling on entries collected by a single walk
    pub max_depth: usize,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_TRAVERSAL_DEPTH,
        }
    }
}

/// Configuration for the whole engine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub traversal: TraversalOptions,
    pub prompt: PromptOptions,
    pub layout: LayoutOptions,
    pub export: ExportOptions,
    pub retry: RetryPolicy,
}

impl EngineConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.traversal.max_depth == 0 {
            return Err(MindMapError::invalid_config(
                "traversal.maxDepth must be greater than 0",
            ));
        }
        self.prompt.validate()?;
        self.layout.validate()?;
        self.retry.validate()?;
        Ok(())
    }
}
