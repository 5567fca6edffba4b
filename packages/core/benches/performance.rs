//! Performance benchmarks for mind-map tree algorithms
//!
//! Run with: `cargo bench -p mindmap-core`
//!
//! These benchmarks measure the interactive paths:
//! - Ancestor traversal on deep chains (every prompt send)
//! - Prompt building with truncation
//! - Whole-tree layout (every "tidy" action)
//! - Markdown export of large trees

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mindmap_core::context::{assemble_context, build_prompt, PromptOptions};
use mindmap_core::export::{export_tree, ExportOptions};
use mindmap_core::layout::{layout, LayoutOptions};
use mindmap_core::models::{edges_from_parent_links, Node, NodeCollection, NodeType};

/// Linear conversation of `len` turns, alternating authors
fn generate_chain(len: usize) -> Vec<Node> {
    (0..len)
        .map(|i| {
            let node_type = match i {
                0 => NodeType::Root,
                i if i % 2 == 1 => NodeType::User,
                _ => NodeType::Ai,
            };
            let parent = (i > 0).then(|| format!("n{}", i - 1));
            Node::new_with_id(
                format!("n{}", i),
                node_type,
                format!("Turn {} with a sentence of ordinary length.", i),
                parent,
            )
        })
        .collect()
}

/// Tree where every node has `fanout` children, breadth-first IDs
fn generate_tree(count: usize, fanout: usize) -> Vec<Node> {
    (0..count)
        .map(|i| {
            let parent = (i > 0).then(|| format!("n{}", (i - 1) / fanout));
            let node_type = if i == 0 { NodeType::Root } else { NodeType::User };
            Node::new_with_id(format!("n{}", i), node_type, format!("Idea {}", i), parent)
        })
        .collect()
}

fn bench_context_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_context");

    for depth in [100usize, 1000] {
        let nodes = NodeCollection::from_list(generate_chain(depth));
        let leaf = format!("n{}", depth - 1);

        group.bench_with_input(BenchmarkId::from_parameter(depth), &leaf, |b, leaf| {
            b.iter(|| black_box(assemble_context(leaf, &nodes)))
        });
    }

    group.finish();
}

fn bench_prompt_building(c: &mut Criterion) {
    let nodes = NodeCollection::from_list(generate_chain(1000));
    let path = assemble_context("n999", &nodes);
    let options = PromptOptions::default().with_token_limit(2000);

    c.bench_function("build_prompt_truncated_1000", |b| {
        b.iter(|| {
            black_box(build_prompt(
                black_box(&path),
                Some("Summarize the thread"),
                None,
                &options,
            ))
        })
    });
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    group.sample_size(20);

    for count in [100usize, 1000] {
        let nodes = generate_tree(count, 3);
        let edges = edges_from_parent_links(&nodes);
        let options = LayoutOptions::default();

        group.bench_with_input(BenchmarkId::from_parameter(count), &nodes, |b, nodes| {
            b.iter(|| black_box(layout(nodes, &edges, &options)))
        });
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_tree");
    group.sample_size(20);

    let wide = generate_tree(1000, 4);
    let deep = generate_chain(1000);
    let options = ExportOptions::default().with_title("Benchmark");

    group.bench_function("wide_1000", |b| {
        b.iter(|| black_box(export_tree(&wide, &options)))
    });
    group.bench_function("deep_1000", |b| {
        b.iter(|| black_box(export_tree(&deep, &options)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_context_assembly,
    bench_prompt_building,
    bench_layout,
    bench_export
);
criterion_main!(benches);
