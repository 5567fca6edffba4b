//! Context Assembly and Prompt Building
//!
//! - [`assembler`] - Cycle-safe, orphan-tolerant ancestor traversal
//! - [`prompt`] - Token-budgeted prompt construction over a conversation path
//!
//! Data flows node store → [`assemble_context`] → [`build_prompt`] → external
//! generation call. Both steps are pure functions of their inputs.

pub mod assembler;
pub mod prompt;

pub use assembler::{
    assemble_context, trace_ancestors, validate_path, AncestorTrace, TraversalStop,
    MAX_TRAVERSAL_DEPTH,
};
pub use prompt::{
    build_prompt, build_selection_prompt, estimate_tokens, truncate_context, PromptOptions,
    PromptResult, CHARS_PER_TOKEN, DEFAULT_SYSTEM_PROMPT, DEFAULT_TOKEN_LIMIT,
};
