use std::collections::BinaryHeap;

use hashbrown::HashMap;
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use super::state::State;
use super::variant::RouteVariant;
use crate::model::StreetGraph;

/// Dijkstra's algorithm over the variant's edge weights
/// Returns a map of reached node indices to their cost from `start`
///
/// With a `target` the search stops once it is settled; only the target's
/// cost is final then. Nodes beyond `max_cost` are not expanded.
pub fn dijkstra_path_weights(
    graph: &StreetGraph,
    start: NodeIndex,
    target: Option<NodeIndex>,
    variant: RouteVariant,
    max_cost: Option<f64>,
) -> HashMap<NodeIndex, f64> {
    let mut distances: HashMap<NodeIndex, f64> = HashMap::new();
    let mut heap = BinaryHeap::new();

    if graph.node(start).is_none() {
        return distances;
    }

    // Start node has distance 0
    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        // Check if we've reached the target
        if target == Some(node) {
            break;
        }

        // Skip if we've found a better path
        if distances.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }

        // Check max cost constraint
        if max_cost.is_some_and(|max| cost > max) {
            continue;
        }

        // Examine neighbors
        for edge in graph.edges(node) {
            let next = edge.target();
            let next_cost = cost + variant.weight(edge.weight());

            // Add or update distance if better using Entry API
            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    distances
}

#[cfg(test)]
mod tests {
    use geo::Point;
    use petgraph::graph::DiGraph;

    use super::*;
    use crate::model::{RoadClass, StreetEdge, StreetNode};

    fn chain() -> (StreetGraph, Vec<NodeIndex>) {
        let mut graph = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..4)
            .map(|i| {
                graph.add_node(StreetNode {
                    id: i,
                    geometry: Point::new(0.0, 0.0),
                })
            })
            .collect();
        for pair in nodes.windows(2) {
            graph.add_edge(pair[0], pair[1], StreetEdge::new(10.0, RoadClass::Trunk));
        }
        (StreetGraph::new(graph), nodes)
    }

    #[test]
    fn costs_accumulate_along_chain() {
        let (graph, nodes) = chain();
        let costs = dijkstra_path_weights(&graph, nodes[0], None, RouteVariant::Shortest, None);
        assert_eq!(costs.len(), 4);
        assert!((costs[&nodes[3]] - 30.0).abs() < 1e-9);

        let costs =
            dijkstra_path_weights(&graph, nodes[0], None, RouteVariant::TrafficAvoiding, None);
        assert!((costs[&nodes[3]] - 42.0).abs() < 1e-9);
    }

    #[test]
    fn max_cost_limits_expansion() {
        let (graph, nodes) = chain();
        let costs =
            dijkstra_path_weights(&graph, nodes[0], None, RouteVariant::Shortest, Some(15.0));
        assert!(costs.contains_key(&nodes[2]));
        assert!(!costs.contains_key(&nodes[3]));
    }

    #[test]
    fn unknown_start_reaches_nothing() {
        let (graph, _) = chain();
        let costs =
            dijkstra_path_weights(&graph, NodeIndex::new(99), None, RouteVariant::Shortest, None);
        assert!(costs.is_empty());
    }
}
