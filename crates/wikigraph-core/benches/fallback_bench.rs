//! # Fallback Benchmarks
//!
//! Cost of the pure fallback computations on synthetic row sets.
//!
//! Run with: `cargo bench -p wikigraph-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use wikigraph_core::fallback::{
    DegreeRow, MembershipRow, NeighborhoodRow, community_labels, degree_centrality,
    jaccard_similar,
};

/// Degree rows with a skewed, repeating degree pattern.
fn degree_rows(size: usize) -> Vec<DegreeRow> {
    (0..size)
        .map(|i| DegreeRow {
            article_id: Some(format!("Q{i}")),
            article_title: None,
            degree: (i % 97) as i64,
        })
        .collect()
}

/// One source with 50 neighbours and `size` overlapping candidates.
fn neighborhood_rows(size: usize) -> Vec<NeighborhoodRow> {
    let source: Vec<i64> = (0..50).collect();
    (0..size)
        .map(|i| {
            let offset = (i % 60) as i64;
            NeighborhoodRow {
                source_neighbors: source.clone(),
                article_id: Some(format!("C{i}")),
                article_title: None,
                candidate_neighbors: (offset..offset + 40).collect(),
            }
        })
        .collect()
}

fn membership_rows(size: usize) -> Vec<MembershipRow> {
    (0..size)
        .map(|i| MembershipRow {
            community_id: i as i64,
            size: (i % 13) as i64,
            density: (i % 2 == 0).then_some(0.25),
        })
        .collect()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_degree_centrality(c: &mut Criterion) {
    let mut group = c.benchmark_group("degree_centrality");

    for size in [1_000, 10_000, 100_000].iter() {
        let rows = degree_rows(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| black_box(degree_centrality(rows.clone(), 10)));
        });
    }

    group.finish();
}

fn bench_jaccard(c: &mut Criterion) {
    let mut group = c.benchmark_group("jaccard_similar");

    for size in [100, 1_000, 5_000].iter() {
        let rows = neighborhood_rows(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| black_box(jaccard_similar(rows, 0.1, 10)));
        });
    }

    group.finish();
}

fn bench_community_labels(c: &mut Criterion) {
    let mut group = c.benchmark_group("community_labels");

    for size in [100, 1_000, 10_000].iter() {
        let rows = membership_rows(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| black_box(community_labels(rows.clone())));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_degree_centrality,
    bench_jaccard,
    bench_community_labels
);
criterion_main!(benches);
