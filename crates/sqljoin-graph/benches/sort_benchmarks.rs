//! Benchmarks for graph construction and topological sorting
//!
//! Measures the depth-first sort on long chains and wide fan-in graphs,
//! the two shapes that dominate real schema directories.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sqljoin_graph::{top_sort, DependencyGraph};

/// Each unit depends on the previous two
fn generate_chain(num_units: usize) -> DependencyGraph {
    let mut graph = DependencyGraph::new();

    for i in (0..num_units).rev() {
        let from = graph.create_node(format!("unit_{}.sql", i));
        for j in i.saturating_sub(2)..i {
            let to = graph.create_node(format!("unit_{}.sql", j));
            graph.add_edge(from, to);
        }
    }

    graph
}

/// Every view depends on every base table
fn generate_fan_in(num_tables: usize, num_views: usize) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    let tables: Vec<_> = (0..num_tables)
        .map(|i| graph.create_node(format!("tables/t_{}.sql", i)))
        .collect();

    for i in 0..num_views {
        let view = graph.create_node(format!("views/v_{}.sql", i));
        for &table in &tables {
            graph.add_edge(view, table);
        }
    }

    graph
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_sort_chain");

    for size in [100, 1_000, 5_000] {
        let graph = generate_chain(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| top_sort(black_box(graph)))
        });
    }

    group.finish();
}

fn bench_fan_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_sort_fan_in");

    for (tables, views) in [(10, 100), (100, 100), (100, 1_000)] {
        let graph = generate_fan_in(tables, views);
        group.bench_with_input(
            BenchmarkId::new("tables_views", format!("{}x{}", tables, views)),
            &graph,
            |b, graph| b.iter(|| top_sort(black_box(graph))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_chain, bench_fan_in);
criterion_main!(benches);
