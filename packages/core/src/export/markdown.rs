//! Markdown export
//!
//! Serializes a mind-map tree as nested Markdown headings. Depth maps to heading
//! level; once the level would pass `######`, deeper nodes become bullet items
//! indented by how far they overflow, so arbitrarily deep trees stay valid
//! Markdown.
//!
//! # Example Output
//!
//! ```markdown
//! # Project Plan
//!
//! ## Phase 1
//!
//! > Selected from: "ship the beta"
//!
//! ### Review architecture
//! ```

use crate::models::Node;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Deepest Markdown heading level
pub const MAX_HEADING_LEVEL: usize = 6;

/// Options for [`export_tree`] / [`export_branch`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Emitted as a leading `#` heading; shifts the tree down one level
    pub title: Option<String>,

    /// Prefix headings with the author glyph (root nodes stay unmarked)
    pub include_node_types: bool,

    /// Append `> Selected from: "..."` under nodes that carry a selection
    pub include_selection_source: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: None,
            include_node_types: false,
            include_selection_source: true,
        }
    }
}

impl ExportOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn effective_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Exported document plus tree metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub markdown: String,
    /// Nodes in the exported tree, including content-less ones
    pub node_count: usize,
    /// Deepest depth reached (export root is 0)
    pub max_depth: usize,
}

/// A node tagged with its depth below the export root
#[derive(Debug, Clone, Copy)]
struct TreeEntry<'a> {
    node: &'a Node,
    depth: usize,
}

fn sort_by_position(nodes: &mut [&Node]) {
    nodes.sort_by(|a, b| {
        a.position
            .y
            .total_cmp(&b.position.y)
            .then(a.position.x.total_cmp(&b.position.x))
    });
}

/// Pre-order walk from `root`, children ordered top-to-bottom then left-to-right.
fn flatten_tree<'a>(root: &'a Node, nodes: &'a [Node]) -> Vec<TreeEntry<'a>> {
    let mut children: HashMap<&str, Vec<&Node>> = HashMap::new();
    for node in nodes {
        if let Some(parent) = node.parent_id.as_deref() {
            children.entry(parent).or_default().push(node);
        }
    }
    for siblings in children.values_mut() {
        sort_by_position(siblings);
    }

    let mut entries = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![TreeEntry {
        node: root,
        depth: 0,
    }];

    while let Some(entry) = stack.pop() {
        if !visited.insert(entry.node.id.as_str()) {
            tracing::warn!(
                "Node {} reached twice during export; skipping repeat",
                entry.node.id
            );
            continue;
        }
        entries.push(entry);

        if let Some(kids) = children.get(entry.node.id.as_str()) {
            for child in kids.iter().rev() {
                stack.push(TreeEntry {
                    node: *child,
                    depth: entry.depth + 1,
                });
            }
        }
    }

    entries
}

/// Leading indentation plus any blockquote and list markers opening a line
static CONTAINER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(?:> ?|(?:[-+*]|[0-9]{1,9}[.)]) +)*").unwrap());

/// Run of three or more backticks or tildes opening a fenced code block
fn fence_run(line: &str) -> Option<&str> {
    let marker = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.len() - line.trim_start_matches(marker).len();
    (len >= 3).then(|| &line[..len])
}

fn is_setext_underline(text: &str) -> bool {
    let text = text.trim_end();
    !text.is_empty() && (text.chars().all(|c| c == '=') || text.chars().all(|c| c == '-'))
}

/// Escape a marker that would turn node content into a heading or a fence.
fn escape_block_marker(line: &str) -> String {
    let lead = CONTAINER_PREFIX.find(line).map_or(0, |m| m.end());
    let (prefix, rest) = line.split_at(lead);
    if rest.starts_with('#') || is_setext_underline(rest) || fence_run(rest).is_some() {
        format!("{}\\{}", prefix, rest)
    } else {
        line.to_string()
    }
}

/// Lines after the first: right-trimmed, blank runs collapsed to one, block
/// markers escaped outside fenced code. An unclosed fence is closed so it
/// cannot swallow the headings that follow.
fn body_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut kept: Vec<&str> = Vec::new();
    for line in lines.map(str::trim_end) {
        if line.is_empty() && kept.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        kept.push(line);
    }

    let mut body = Vec::with_capacity(kept.len() + 1);
    let mut open_fence: Option<String> = None;

    for line in kept {
        let trimmed = line.trim_start();
        if let Some(open) = open_fence.as_deref() {
            let closes = fence_run(trimmed).is_some_and(|run| {
                run.starts_with(open) && trimmed[run.len()..].trim().is_empty()
            });
            if closes {
                open_fence = None;
            }
            body.push(line.to_string());
        } else if let Some(run) = fence_run(trimmed) {
            open_fence = Some(run.to_string());
            body.push(line.to_string());
        } else {
            body.push(escape_block_marker(line));
        }
    }

    if let Some(open) = open_fence {
        body.push(open);
    }
    body
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn render(entries: &[TreeEntry<'_>], options: &ExportOptions) -> String {
    let mut out = String::new();
    let start_level = match options.effective_title() {
        Some(title) => {
            out.push_str(&format!("# {}\n\n", title));
            2
        }
        None => 1,
    };

    let mut in_list = false;

    for entry in entries {
        let node = entry.node;
        if node.is_blank() {
            continue;
        }

        let mut lines = node.content.trim().lines();
        let first = escape_block_marker(lines.next().unwrap_or_default().trim());
        let rest = body_lines(lines);

        let text = match node.node_type.glyph().filter(|_| options.include_node_types) {
            Some(glyph) => format!("{} {}", glyph, first),
            None => first,
        };
        let selection = node
            .selection_source
            .as_deref()
            .filter(|s| options.include_selection_source && !s.trim().is_empty())
            .map(single_line);

        let level = entry.depth + start_level;
        if level <= MAX_HEADING_LEVEL {
            if in_list {
                out.push('\n');
                in_list = false;
            }
            out.push_str(&format!("{} {}\n\n", "#".repeat(level), text));
            if !rest.is_empty() {
                out.push_str(&rest.join("\n"));
                out.push_str("\n\n");
            }
            if let Some(selection) = selection {
                out.push_str(&format!("> Selected from: \"{}\"\n\n", selection));
            }
        } else {
            let indent = "  ".repeat(level - MAX_HEADING_LEVEL - 1);
            out.push_str(&format!("{}- {}\n", indent, text));
            for line in &rest {
                if line.is_empty() {
                    out.push('\n');
                } else {
                    out.push_str(&format!("{}  {}\n", indent, line));
                }
            }
            if let Some(selection) = selection {
                out.push_str(&format!("{}  > Selected from: \"{}\"\n", indent, selection));
            }
            in_list = true;
        }
    }

    out.trim_end().to_string()
}

fn export_from_root(root: &Node, nodes: &[Node], options: &ExportOptions) -> ExportResult {
    let entries = flatten_tree(root, nodes);
    let max_depth = entries.iter().map(|e| e.depth).max().unwrap_or(0);

    ExportResult {
        markdown: render(&entries, options),
        node_count: entries.len(),
        max_depth,
    }
}

/// Export the whole tree rooted at the node with no parent.
///
/// Returns an empty result when there is no root. With several parentless
/// nodes the first one wins.
pub fn export_tree(nodes: &[Node], options: &ExportOptions) -> ExportResult {
    let mut roots = nodes.iter().filter(|n| n.is_root());
    let Some(root) = roots.next() else {
        if !nodes.is_empty() {
            tracing::warn!(
                "No root node among {} nodes; nothing to export",
                nodes.len()
            );
        }
        return ExportResult::default();
    };

    let extra = roots.count();
    if extra > 0 {
        tracing::warn!(
            "Found {} additional root nodes; exporting the tree under {}",
            extra,
            root.id
        );
    }

    export_from_root(root, nodes, options)
}

/// IDs of `branch_root_id` and all of its transitive descendants.
///
/// Expands to a fixed point over parent links instead of recursing, so tree
/// depth never touches the stack.
pub fn collect_branch_ids<'a>(nodes: &'a [Node], branch_root_id: &'a str) -> HashSet<&'a str> {
    let mut ids: HashSet<&str> = HashSet::new();
    ids.insert(branch_root_id);

    loop {
        let before = ids.len();
        for node in nodes {
            if let Some(parent) = node.parent_id.as_deref() {
                if ids.contains(parent) {
                    ids.insert(node.id.as_str());
                }
            }
        }
        if ids.len() == before {
            break;
        }
    }

    ids
}

/// Export the subtree under `branch_root_id`, treating it as the root.
///
/// Siblings and ancestors of the branch root are excluded. An unknown branch
/// root yields an empty result.
pub fn export_branch(nodes: &[Node], branch_root_id: &str, options: &ExportOptions) -> ExportResult {
    if !nodes.iter().any(|n| n.id == branch_root_id) {
        tracing::warn!("Branch root {} not found; nothing to export", branch_root_id);
        return ExportResult::default();
    }

    let ids = collect_branch_ids(nodes, branch_root_id);
    let branch: Vec<Node> = nodes
        .iter()
        .filter(|n| ids.contains(n.id.as_str()))
        .map(|n| {
            let mut n = n.clone();
            if n.id == branch_root_id {
                n.parent_id = None;
            }
            n
        })
        .collect();

    match branch.iter().find(|n| n.id == branch_root_id) {
        Some(root) => export_from_root(root, &branch, options),
        None => ExportResult::default(),
    }
}

#[cfg(test)]
#[path = "markdown_test.rs"]
mod markdown_test;
