use std::ops::Range;

use geo::Point;
use petgraph::graph::{DiGraph, NodeIndex};
use proptest::prelude::*;
use routewise_core::model::haversine;
use routewise_core::prelude::*;

type RawEdge = (usize, usize, f64, usize);

fn assemble(
    coords: &[(f64, f64)],
    edges: Vec<RawEdge>,
    length_of: impl Fn(f64, f64) -> f64,
) -> StreetGraph {
    let mut inner = DiGraph::new();
    let nodes: Vec<NodeIndex> = coords
        .iter()
        .enumerate()
        .map(|(i, &(dlat, dlon))| {
            inner.add_node(StreetNode {
                id: i as NodeId + 1,
                geometry: Point::new(77.59 + dlon, 12.97 + dlat),
            })
        })
        .collect();
    for (from, to, sample, class) in edges {
        if from == to {
            continue;
        }
        let straight = haversine(inner[nodes[from]].geometry, inner[nodes[to]].geometry);
        inner.add_edge(
            nodes[from],
            nodes[to],
            StreetEdge::new(length_of(straight, sample), RoadClass::ALL[class]),
        );
    }
    StreetGraph::new(inner)
}

fn raw_graph(sample: Range<f64>) -> impl Strategy<Value = (Vec<(f64, f64)>, Vec<RawEdge>)> {
    (2usize..24).prop_flat_map(move |n| {
        let coords = prop::collection::vec((0.0f64..0.01, 0.0f64..0.01), n);
        let edges = prop::collection::vec(
            (0..n, 0..n, sample.clone(), 0..RoadClass::ALL.len()),
            0..n * 3,
        );
        (coords, edges)
    })
}

/// Random street graph: nodes scattered over ~1 km, every edge at least as
/// long as the straight line between its endpoints
fn street_graph() -> impl Strategy<Value = StreetGraph> {
    raw_graph(0.0..0.5).prop_map(|(coords, edges)| {
        assemble(&coords, edges, |straight, detour| straight * (1.0 + detour) + 1.0)
    })
}

/// Same layout with any non-negative lengths, zero and far below the
/// straight-line distance included
fn unconstrained_graph() -> impl Strategy<Value = StreetGraph> {
    raw_graph(0.0..2000.0).prop_map(|(coords, edges)| {
        assemble(&coords, edges, |_, length| if length < 100.0 { 0.0 } else { length - 100.0 })
    })
}

fn variant() -> impl Strategy<Value = RouteVariant> {
    (0..RouteVariant::ALL.len()).prop_map(|i| RouteVariant::ALL[i])
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

fn check_against_dijkstra(
    graph: &StreetGraph,
    variant: RouteVariant,
    start: NodeIndex,
    end: NodeIndex,
) -> Result<(), TestCaseError> {
    let reference = dijkstra_path_weights(graph, start, None, variant, None);
    match search(graph, start, end, variant) {
        Ok(result) => {
            let expected = reference.get(&end).copied();
            prop_assert!(expected.is_some());
            prop_assert!(
                close(result.cost, expected.unwrap_or_default()),
                "A* {} vs Dijkstra {:?}",
                result.cost,
                expected
            );
        }
        Err(Error::NoPathFound { .. }) => prop_assert!(!reference.contains_key(&end)),
        Err(other) => prop_assert!(false, "unexpected error {other}"),
    }
    Ok(())
}

proptest! {
    #[test]
    fn astar_matches_dijkstra_for_any_lengths(
        graph in unconstrained_graph(),
        variant in variant(),
        pick in (any::<prop::sample::Index>(), any::<prop::sample::Index>()),
    ) {
        let start = NodeIndex::new(pick.0.index(graph.node_count()));
        let end = NodeIndex::new(pick.1.index(graph.node_count()));
        check_against_dijkstra(&graph, variant, start, end)?;
    }

    #[test]
    fn astar_matches_dijkstra(
        graph in street_graph(),
        variant in variant(),
        pick in (any::<prop::sample::Index>(), any::<prop::sample::Index>()),
    ) {
        let start = NodeIndex::new(pick.0.index(graph.node_count()));
        let end = NodeIndex::new(pick.1.index(graph.node_count()));
        prop_assert!(graph.heuristic_admissible());
        check_against_dijkstra(&graph, variant, start, end)?;
    }

    #[test]
    fn path_is_a_walk_along_its_edges(
        graph in street_graph(),
        variant in variant(),
        pick in (any::<prop::sample::Index>(), any::<prop::sample::Index>()),
    ) {
        let start = NodeIndex::new(pick.0.index(graph.node_count()));
        let end = NodeIndex::new(pick.1.index(graph.node_count()));

        if let Ok(result) = search(&graph, start, end, variant) {
            prop_assert_eq!(result.path.first(), Some(&start));
            prop_assert_eq!(result.path.last(), Some(&end));
            prop_assert_eq!(result.edges.len() + 1, result.path.len());

            let mut cost = 0.0;
            let mut distance = 0.0;
            for (pair, &edge_idx) in result.path.windows(2).zip(&result.edges) {
                prop_assert_eq!(graph.edge_endpoints(edge_idx), Some((pair[0], pair[1])));
                prop_assert!(graph.has_edge(pair[0], pair[1]));
                let edge = graph.edge(edge_idx).unwrap();
                cost += variant.weight(edge);
                distance += edge.length;
            }
            prop_assert!(close(result.cost, cost));
            prop_assert!(close(result.distance_m, distance));
            prop_assert!(result.cost >= result.distance_m - 1e-6);
        }
    }
}
