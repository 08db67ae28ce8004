use std::collections::BinaryHeap;

use hashbrown::HashMap;
use log::debug;
use petgraph::{
    graph::{EdgeIndex, NodeIndex},
    visit::EdgeRef,
};

use super::observer::{NoopObserver, SearchObserver};
use super::state::State;
use super::variant::RouteVariant;
use crate::model::{StreetGraph, haversine};
use crate::{Error, Meters, NodeId};

/// Path found by the search engine
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Nodes from start to end, both inclusive
    pub path: Vec<NodeIndex>,
    /// Edge taken between each consecutive pair of `path`
    pub edges: Vec<EdgeIndex>,
    /// Sum of the variant weights of `edges`
    pub cost: f64,
    /// Sum of the raw lengths of `edges`
    pub distance_m: Meters,
    pub variant: RouteVariant,
}

impl RouteResult {
    /// Provider ids of the path nodes
    pub fn node_ids(&self, graph: &StreetGraph) -> Vec<NodeId> {
        self.path
            .iter()
            .filter_map(|&idx| graph.node_id(idx))
            .collect()
    }
}

/// A* search from `start` to `end` under `variant`
///
/// # Errors
///
/// Returns `Error::NoPathFound` if `end` is unreachable from `start` and
/// `Error::InvalidNodeIndex` if either node is not part of the graph
pub fn search(
    graph: &StreetGraph,
    start: NodeIndex,
    end: NodeIndex,
    variant: RouteVariant,
) -> Result<RouteResult, Error> {
    search_with_observer(graph, start, end, variant, &mut NoopObserver)
}

/// [`search`] reporting every expansion to `observer`
///
/// The frontier holds `(f_score, node)` entries. Besides the best g-score,
/// the best f-score ever queued is remembered per node: a neighbor is queued
/// only when it improves on that, and an entry popped with an f-score above
/// it is stale and skipped.
///
/// # Errors
///
/// See [`search`]
pub fn search_with_observer<O>(
    graph: &StreetGraph,
    start: NodeIndex,
    end: NodeIndex,
    variant: RouteVariant,
    observer: &mut O,
) -> Result<RouteResult, Error>
where
    O: SearchObserver + ?Sized,
{
    let (Some(start_id), Some(goal)) = (graph.node_id(start), graph.location(end)) else {
        return Err(Error::InvalidNodeIndex);
    };
    let end_id = graph.node_id(end).ok_or(Error::InvalidNodeIndex)?;

    // Without the length guarantee the search degrades to Dijkstra
    let scale = if graph.heuristic_admissible() {
        variant.min_factor()
    } else {
        debug!("Edges shorter than their straight line, searching without heuristic");
        0.0
    };
    let heuristic = |node: NodeIndex| {
        graph
            .location(node)
            .map_or(0.0, |point| haversine(point, goal) * scale)
    };

    let estimated_nodes = graph.node_count().min(1000);
    let mut g_score: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut f_queued: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut came_from: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> =
        HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);
    let mut expanded = 0usize;

    let start_f = heuristic(start);
    g_score.insert(start, 0.0);
    f_queued.insert(start, start_f);
    heap.push(State {
        cost: start_f,
        node: start,
    });

    debug!("Starting A* from {start_id} to {end_id} ({variant})");

    while let Some(State { cost: f, node }) = heap.pop() {
        // Skip entries superseded by a better push
        if f_queued.get(&node).is_some_and(|&best| f > best) {
            continue;
        }
        let g = g_score.get(&node).copied().unwrap_or(f64::INFINITY);

        expanded += 1;
        observer.on_expand(node, g, f);

        if node == end {
            let result = reconstruct(graph, &came_from, start, end, g, variant);
            debug!(
                "Path found: {} nodes, cost {:.2}, distance {:.2} m, {expanded} expansions",
                result.path.len(),
                result.cost,
                result.distance_m
            );
            observer.on_finish(expanded, true);
            return Ok(result);
        }

        for edge in graph.edges(node) {
            let next = edge.target();
            let tentative = g + variant.weight(edge.weight());

            if tentative < g_score.get(&next).copied().unwrap_or(f64::INFINITY) {
                came_from.insert(next, (node, edge.id()));
                g_score.insert(next, tentative);

                let next_f = tentative + heuristic(next);
                if next_f < f_queued.get(&next).copied().unwrap_or(f64::INFINITY) {
                    f_queued.insert(next, next_f);
                    heap.push(State {
                        cost: next_f,
                        node: next,
                    });
                }
            }
        }
    }

    observer.on_finish(expanded, false);
    Err(Error::NoPathFound {
        start: start_id,
        end: end_id,
    })
}

fn reconstruct(
    graph: &StreetGraph,
    came_from: &HashMap<NodeIndex, (NodeIndex, EdgeIndex)>,
    start: NodeIndex,
    end: NodeIndex,
    cost: f64,
    variant: RouteVariant,
) -> RouteResult {
    let mut path = vec![end];
    let mut edges = Vec::new();
    let mut current = end;
    while current != start {
        let Some(&(prev, edge)) = came_from.get(&current) else {
            break;
        };
        edges.push(edge);
        path.push(prev);
        current = prev;
    }
    path.reverse();
    edges.reverse();

    let distance_m = edges
        .iter()
        .filter_map(|&idx| graph.edge(idx))
        .map(|edge| edge.length)
        .sum();

    RouteResult {
        path,
        edges,
        cost,
        distance_m,
        variant,
    }
}
