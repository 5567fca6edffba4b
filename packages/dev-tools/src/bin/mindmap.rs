//! Mind-map command line tool
//!
//! Runs the core algorithms over a JSON nodes file so trees can be inspected
//! without the desktop app.
//!
//! The nodes file is either an array of nodes or an object keyed by node ID.
//! Results go to stdout as JSON (or Markdown for `export`); diagnostics go to
//! stderr and honour `RUST_LOG`.
//!
//! # Usage
//!
//! ```bash
//! mindmap --nodes tree.json context n42
//! mindmap --nodes tree.json prompt n42 --message "What next?" --token-limit 2000
//! mindmap --nodes tree.json layout --direction LR --anchor n7
//! mindmap --nodes tree.json --config engine.json export --title "Roadmap" --out-dir ./out
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mindmap_core::{
    build_prompt, build_selection_prompt, edges_from_parent_links,
    export::export_filename_today, export_branch, export_tree, layout, layout_descendants,
    trace_ancestors, EngineConfig, LayoutDirection, NodeCollection,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mindmap",
    version,
    about = "Inspect, lay out and export conversational mind-map trees"
)]
struct Cli {
    /// JSON file holding the nodes (array or ID-keyed object)
    #[arg(long, short = 'n', global = true, default_value = "nodes.json")]
    nodes: PathBuf,

    /// Engine configuration file (JSON)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the root-first conversation path ending at a node
    Context {
        node_id: String,
    },
    /// Build the LLM prompt for a new turn branching from a node
    Prompt {
        node_id: String,
        /// The user's question
        #[arg(long, short)]
        message: Option<String>,
        /// Selected text the branch was created from
        #[arg(long, short)]
        selection: Option<String>,
        /// Override the configured token budget
        #[arg(long)]
        token_limit: Option<usize>,
    },
    /// Compute node positions
    Layout {
        /// TB, BT, LR or RL
        #[arg(long, short)]
        direction: Option<LayoutDirection>,
        /// Only re-layout the descendants of this node
        #[arg(long, short)]
        anchor: Option<String>,
    },
    /// Render the tree (or one branch) as Markdown
    Export {
        /// Export only the subtree rooted here
        #[arg(long, short)]
        branch: Option<String>,
        /// Document title
        #[arg(long, short)]
        title: Option<String>,
        /// Write a dated file into this directory instead of printing
        #[arg(long, short)]
        out_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let nodes = load_nodes(&cli.nodes)?;
    tracing::debug!("Loaded {} nodes from {}", nodes.len(), cli.nodes.display());

    match cli.command {
        Command::Context { node_id } => run_context(&nodes, &node_id, &config),
        Command::Prompt {
            node_id,
            message,
            selection,
            token_limit,
        } => run_prompt(
            &nodes,
            &node_id,
            message.as_deref(),
            selection.as_deref(),
            token_limit,
            config,
        ),
        Command::Layout { direction, anchor } => {
            run_layout(&nodes, direction, anchor.as_deref(), config)
        }
        Command::Export {
            branch,
            title,
            out_dir,
        } => run_export(&nodes, branch.as_deref(), title, out_dir.as_deref(), config),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_nodes(path: &Path) -> Result<NodeCollection> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read nodes file {}", path.display()))?;
    NodeCollection::from_json_str(&json)
        .with_context(|| format!("Failed to parse nodes file {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_context(nodes: &NodeCollection, node_id: &str, config: &EngineConfig) -> Result<()> {
    nodes.require(node_id)?;
    let trace = trace_ancestors(node_id, nodes, config.traversal.max_depth);
    if !trace.is_complete() {
        tracing::warn!("Context path is partial: {:?}", trace.stop);
    }
    print_json(&trace.entries)
}

fn run_prompt(
    nodes: &NodeCollection,
    node_id: &str,
    message: Option<&str>,
    selection: Option<&str>,
    token_limit: Option<usize>,
    config: EngineConfig,
) -> Result<()> {
    let mut options = config.prompt;
    if let Some(limit) = token_limit {
        options = options.with_token_limit(limit);
        options.validate()?;
    }

    nodes.require(node_id)?;
    let trace = trace_ancestors(node_id, nodes, config.traversal.max_depth);

    let result = match selection {
        Some(selection) => build_selection_prompt(&trace.entries, selection, message, &options)?,
        None => build_prompt(&trace.entries, message, None, &options),
    };
    if result.was_truncated {
        tracing::info!(
            "Context truncated: kept {} of {} nodes",
            result.included_nodes,
            result.total_nodes
        );
    }
    println!("{}", result.prompt);
    Ok(())
}

fn run_layout(
    nodes: &NodeCollection,
    direction: Option<LayoutDirection>,
    anchor: Option<&str>,
    config: EngineConfig,
) -> Result<()> {
    let mut options = config.layout;
    if let Some(direction) = direction {
        options = options.with_direction(direction);
    }

    let edges = edges_from_parent_links(nodes.as_slice());
    let result = match anchor {
        Some(anchor_id) => {
            nodes.require(anchor_id)?;
            layout_descendants(anchor_id, nodes.as_slice(), &edges, &options)
        }
        None => layout(nodes.as_slice(), &edges, &options),
    };
    print_json(&result.positions())
}

fn run_export(
    nodes: &NodeCollection,
    branch: Option<&str>,
    title: Option<String>,
    out_dir: Option<&Path>,
    config: EngineConfig,
) -> Result<()> {
    let mut options = config.export;
    if let Some(title) = title {
        options = options.with_title(title);
    }

    let result = match branch {
        Some(branch_id) => {
            nodes.require(branch_id)?;
            export_branch(nodes.as_slice(), branch_id, &options)
        }
        None => export_tree(nodes.as_slice(), &options),
    };
    if result.node_count == 0 {
        tracing::warn!("Nothing to export: no root node found");
    }

    match out_dir {
        Some(dir) => {
            let filename = export_filename_today(options.title.as_deref().unwrap_or_default());
            let path = dir.join(filename);
            std::fs::write(&path, &result.markdown)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(
                "Exported {} nodes (depth {}) to {}",
                result.node_count,
                result.max_depth,
                path.display()
            );
        }
        None => println!("{}", result.markdown),
    }
    Ok(())
}
