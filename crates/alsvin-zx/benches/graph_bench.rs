//! Benchmarks for ZX-graph editing operations
//!
//! Run with: cargo bench -p alsvin-zx

use alsvin_types::Phase;
use alsvin_zx::{EdgeKind, VertexKind, ZxGraph};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// A ladder of spiders with crossing Hadamard edges.
fn ladder(rungs: usize) -> ZxGraph {
    let mut graph = ZxGraph::new();
    let mut prev = None;
    for i in 0..rungs {
        let a = graph.add_spider(VertexKind::Z, Phase::new(1, 4), 0.0, i as f64);
        let b = graph.add_spider(VertexKind::Z, Phase::zero(), 1.0, i as f64);
        graph.add_edge(a, b, EdgeKind::Hadamard).unwrap();
        if let Some((pa, pb)) = prev {
            graph.add_edge(pa, a, EdgeKind::Hadamard).unwrap();
            graph.add_edge(pb, b, EdgeKind::Hadamard).unwrap();
        }
        prev = Some((a, b));
    }
    graph
}

/// Benchmark edge insertion with normalisation
fn bench_add_edge(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_edge");

    for size in &[10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("ladder", size), size, |b, &n| {
            b.iter(|| ladder(black_box(n)));
        });
    }

    group.finish();
}

/// Benchmark whole-graph operations
fn bench_graph_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_ops");

    let graph = ladder(200);
    group.bench_function("clone", |b| {
        b.iter(|| black_box(&graph).clone());
    });

    group.bench_function("edges_iteration", |b| {
        b.iter(|| black_box(&graph).edges().count());
    });

    group.bench_function("adjoint", |b| {
        let mut g = graph.clone();
        b.iter(|| g.adjoint());
    });

    group.bench_function("tensor", |b| {
        b.iter_batched(
            || graph.clone(),
            |mut g| {
                let other = ladder(10);
                g.tensor(black_box(&other));
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_add_edge, bench_graph_ops);
criterion_main!(benches);
