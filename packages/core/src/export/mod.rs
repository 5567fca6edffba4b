//! Markdown Export
//!
//! - [`markdown`] - Heading-nested document for a whole tree or a branch
//! - [`filename`] - Deterministic download filenames

pub mod filename;
pub mod markdown;

pub use filename::{export_filename, export_filename_today, slugify, DEFAULT_FILENAME_STEM};
pub use markdown::{
    collect_branch_ids, export_branch, export_tree, ExportOptions, ExportResult,
    MAX_HEADING_LEVEL,
};
