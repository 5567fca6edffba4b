//! Prompt construction
//!
//! Turns a conversation path into the single prompt string handed to the external
//! generation call. The prompt is assembled from fixed sections:
//!
//! 1. System prompt
//! 2. `## Conversation Path` - one `Label: content` line per entry
//! 3. `## User Selected Text` - the selection that triggered this branch
//! 4. `## User Question` - the user's message
//! 5. A closing instruction that depends on whether a selection is present
//!
//! When the path does not fit the token budget, the root entry is always kept and
//! the remaining budget is filled from the most recent entries backward.
//!
//! # Token estimation
//!
//! Tokens are estimated as `ceil(chars / 4)`. This is a fixed heuristic, not a
//! tokenizer, and budget tests depend on the exact ratio.

use crate::error::{MindMapError, Result};
use crate::models::ContextEntry;
use serde::{Deserialize, Serialize};

/// Characters per estimated token
pub const CHARS_PER_TOKEN: usize = 4;

/// Default prompt budget in estimated tokens
pub const DEFAULT_TOKEN_LIMIT: usize = 8000;

/// Default instructional system prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant in a mind-mapping application. \
The user is exploring ideas by branching a tree of notes and answers. \
Use the conversation path below as context and give a focused, well-structured response \
that extends the user's line of thinking.";

const INSTRUCTION_WITH_SELECTION: &str = "Please respond to the user's question, focusing on the selected text \
and how it relates to the conversation path above.";

const INSTRUCTION_WITHOUT_SELECTION: &str =
    "Please respond to the user's question, taking the conversation path above into account.";

/// Estimate token count from text (4 characters per token, rounded up)
///
/// # Examples
///
/// ```rust
/// use mindmap_core::context::estimate_tokens;
///
/// assert_eq!(estimate_tokens(""), 0);
/// assert_eq!(estimate_tokens("test"), 1);
/// assert_eq!(estimate_tokens("12345678"), 2);
/// assert_eq!(estimate_tokens("hello"), 2);
/// ```
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Options for [`build_prompt`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptOptions {
    /// Total budget in estimated tokens
    pub token_limit: usize,

    /// Leading instructional text
    pub system_prompt: String,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            token_limit: DEFAULT_TOKEN_LIMIT,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl PromptOptions {
    pub fn with_token_limit(mut self, token_limit: usize) -> Self {
        self.token_limit = token_limit;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.token_limit == 0 {
            return Err(MindMapError::invalid_config(
                "prompt.tokenLimit must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Built prompt plus truncation bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptResult {
    pub prompt: String,
    pub was_truncated: bool,
    pub included_nodes: usize,
    pub total_nodes: usize,
}

/// Format one path entry as a transcript line
fn format_entry(entry: &ContextEntry) -> String {
    let mut line = format!("{}: {}", entry.node_type.label(), entry.content);
    if let Some(selection) = entry.selection_source.as_deref().filter(|s| !s.trim().is_empty()) {
        line.push_str(&format!(" [Selected text: \"{}\"]", selection));
    }
    line
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Keep the root entry plus as many of the most recent entries as fit in
/// `budget` estimated tokens, returned in chronological order.
///
/// The root is kept even when it alone exceeds the budget.
pub fn truncate_context(path: &[ContextEntry], budget: usize) -> Vec<&ContextEntry> {
    let Some((root, rest)) = path.split_first() else {
        return Vec::new();
    };

    let mut used = estimate_tokens(&format_entry(root));
    let mut recent: Vec<&ContextEntry> = Vec::new();

    for entry in rest.iter().rev() {
        let cost = estimate_tokens(&format_entry(entry));
        if used + cost > budget {
            break;
        }
        used += cost;
        recent.push(entry);
    }

    recent.reverse();

    let mut kept = Vec::with_capacity(recent.len() + 1);
    kept.push(root);
    kept.extend(recent);
    kept
}

/// Build the prompt for a generation request.
///
/// # Arguments
///
/// * `context_path` - Root-first conversation path
/// * `user_message` - The user's question, if any
/// * `selection_source` - Selection that triggered the current branch, if any
/// * `options` - Budget and system prompt
///
/// Blank `user_message` / `selection_source` values are treated as absent.
pub fn build_prompt(
    context_path: &[ContextEntry],
    user_message: Option<&str>,
    selection_source: Option<&str>,
    options: &PromptOptions,
) -> PromptResult {
    let user_message = non_blank(user_message);
    let selection_source = non_blank(selection_source);

    let selection_section =
        selection_source.map(|s| format!("## User Selected Text\n\"{}\"", s));
    let question_section = user_message.map(|m| format!("## User Question\n{}", m));
    let instruction = if selection_source.is_some() {
        INSTRUCTION_WITH_SELECTION
    } else {
        INSTRUCTION_WITHOUT_SELECTION
    };

    let reserved = estimate_tokens(&options.system_prompt)
        + selection_section.as_deref().map_or(0, estimate_tokens)
        + question_section.as_deref().map_or(0, estimate_tokens)
        + estimate_tokens(instruction);
    let budget = options.token_limit.saturating_sub(reserved);

    let total_nodes = context_path.len();
    let context_tokens: usize = context_path
        .iter()
        .map(|entry| estimate_tokens(&format_entry(entry)))
        .sum();

    let kept: Vec<&ContextEntry> = if context_tokens > budget {
        truncate_context(context_path, budget)
    } else {
        context_path.iter().collect()
    };

    let included_nodes = kept.len();
    let was_truncated = included_nodes < total_nodes;
    if was_truncated {
        tracing::debug!(
            "Prompt context truncated: kept {} of {} entries (budget {} tokens)",
            included_nodes,
            total_nodes,
            budget
        );
    }

    let mut sections: Vec<String> = Vec::new();
    if !options.system_prompt.trim().is_empty() {
        sections.push(options.system_prompt.clone());
    }
    if !kept.is_empty() {
        let lines: Vec<String> = kept.iter().map(|entry| format_entry(entry)).collect();
        sections.push(format!("## Conversation Path\n{}", lines.join("\n")));
    }
    sections.extend(selection_section);
    sections.extend(question_section);
    sections.push(instruction.to_string());

    PromptResult {
        prompt: sections.join("\n\n"),
        was_truncated,
        included_nodes,
        total_nodes,
    }
}

/// Build the prompt for a branch created from selected text.
///
/// Fails with [`MindMapError::InvalidArgument`] when `selection_source` is empty
/// or whitespace only.
pub fn build_selection_prompt(
    context_path: &[ContextEntry],
    selection_source: &str,
    user_message: Option<&str>,
    options: &PromptOptions,
) -> Result<PromptResult> {
    if selection_source.trim().is_empty() {
        return Err(MindMapError::invalid_argument(
            "selection source must not be empty",
        ));
    }

    Ok(build_prompt(
        context_path,
        user_message,
        Some(selection_source),
        options,
    ))
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod prompt_test;
