//! A* on a synthetic street grid, one benchmark per route type and distance
//!
//! Run with: cargo bench -p routewise_core

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use geo::Point;
use petgraph::graph::{DiGraph, NodeIndex};
use routewise_core::model::haversine;
use routewise_core::prelude::*;

const SIDE: usize = 120;
const STEP_DEG: f64 = 0.0008;

/// Two-way grid of `SIDE x SIDE` intersections; every tenth street is primary
fn build_grid() -> (StreetGraph, Vec<NodeIndex>) {
    let mut inner = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..SIDE * SIDE)
        .map(|i| {
            let (row, col) = (i / SIDE, i % SIDE);
            inner.add_node(StreetNode {
                id: i as NodeId,
                geometry: Point::new(
                    77.55 + col as f64 * STEP_DEG,
                    12.93 + row as f64 * STEP_DEG,
                ),
            })
        })
        .collect();

    let mut connect = |a: usize, b: usize, line: usize| {
        let class = if line % 10 == 0 {
            RoadClass::Primary
        } else {
            RoadClass::Residential
        };
        let length = haversine(inner[nodes[a]].geometry, inner[nodes[b]].geometry);
        inner.add_edge(nodes[a], nodes[b], StreetEdge::new(length, class));
        inner.add_edge(nodes[b], nodes[a], StreetEdge::new(length, class));
    };
    for row in 0..SIDE {
        for col in 0..SIDE {
            let here = row * SIDE + col;
            if col + 1 < SIDE {
                connect(here, here + 1, row);
            }
            if row + 1 < SIDE {
                connect(here, here + SIDE, col);
            }
        }
    }
    (StreetGraph::new(inner), nodes)
}

fn bench_search(c: &mut Criterion) {
    let (graph, nodes) = build_grid();
    let at = |row: usize, col: usize| nodes[row * SIDE + col];
    let tiers = [
        ("short", at(5, 5), at(15, 15)),
        ("medium", at(5, 5), at(60, 60)),
        ("cross", at(0, 0), at(SIDE - 1, SIDE - 1)),
    ];

    let mut group = c.benchmark_group("astar");
    for variant in RouteVariant::ALL {
        for (tier, start, end) in tiers {
            group.bench_with_input(
                BenchmarkId::new(variant.as_str(), tier),
                &(start, end),
                |b, &(start, end)| {
                    b.iter(|| search(black_box(&graph), start, end, variant));
                },
            );
        }
    }
    group.finish();
}

fn bench_traffic(c: &mut Criterion) {
    let estimator = TrafficEstimator::new();
    let path: Vec<NodeId> = (0..400).collect();

    c.bench_function("best_hour_400_nodes", |b| {
        b.iter(|| estimator.best_hour(black_box(&path), 30.0));
    });
}

criterion_group!(benches, bench_search, bench_traffic);
criterion_main!(benches);
