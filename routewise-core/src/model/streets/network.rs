//! Immutable street graph with a spatial index for snapping coordinates

use std::fmt;

use geo::Point;
use hashbrown::HashMap;
use petgraph::{
    Directed,
    graph::{DiGraph, EdgeIndex, Edges, NodeIndex},
    visit::EdgeRef,
};
use rstar::{RTree, primitives::GeomWithData};

use super::components::{StreetEdge, StreetNode};
use crate::NodeId;
use crate::model::haversine;

/// Relative slack for lengths derived from the same coordinates
const LENGTH_TOLERANCE: f64 = 1e-9;

/// R-tree entry: `[lon, lat]` of a graph node plus its index
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Directed, possibly multi-edge road network
///
/// The graph is never mutated after construction; it is shared read-only
/// between concurrent searches behind an `Arc`.
pub struct StreetGraph {
    graph: DiGraph<StreetNode, StreetEdge>,
    rtree: RTree<IndexedPoint>,
    node_ids: HashMap<NodeId, NodeIndex>,
    heuristic_admissible: bool,
}

impl StreetGraph {
    pub fn new(graph: DiGraph<StreetNode, StreetEdge>) -> Self {
        let points = graph
            .node_indices()
            .map(|idx| {
                let geometry = graph[idx].geometry;
                IndexedPoint::new([geometry.x(), geometry.y()], idx)
            })
            .collect();
        let node_ids = graph
            .node_indices()
            .map(|idx| (graph[idx].id, idx))
            .collect();
        let heuristic_admissible = graph.edge_references().all(|edge| {
            let straight = haversine(
                graph[edge.source()].geometry,
                graph[edge.target()].geometry,
            );
            edge.weight().length >= straight * (1.0 - LENGTH_TOLERANCE)
        });

        Self {
            graph,
            rtree: RTree::bulk_load(points),
            node_ids,
            heuristic_admissible,
        }
    }

    /// Whether every edge is at least as long as the great-circle distance
    /// between its endpoints
    ///
    /// Only then does a straight-line estimate never overshoot the remaining
    /// path cost.
    pub fn heuristic_admissible(&self) -> bool {
        self.heuristic_admissible
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&StreetNode> {
        self.graph.node_weight(idx)
    }

    pub fn node_id(&self, idx: NodeIndex) -> Option<NodeId> {
        self.node(idx).map(|node| node.id)
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_ids.get(&id).copied()
    }

    pub fn location(&self, idx: NodeIndex) -> Option<Point<f64>> {
        self.node(idx).map(|node| node.geometry)
    }

    pub fn edge(&self, idx: EdgeIndex) -> Option<&StreetEdge> {
        self.graph.edge_weight(idx)
    }

    pub fn edge_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// Outgoing edges of `node`, parallel edges included
    pub fn edges(&self, node: NodeIndex) -> Edges<'_, StreetEdge, Directed> {
        self.graph.edges(node)
    }

    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.edges(from).any(|edge| edge.target() == to)
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    /// Node closest to `point`
    ///
    /// Distances are planar in degrees, which is adequate for picking the
    /// closest intersection inside a city-scale graph.
    pub fn nearest_node(&self, point: &Point<f64>) -> Option<NodeIndex> {
        self.rtree
            .nearest_neighbor(&[point.x(), point.y()])
            .map(|entry| entry.data)
    }
}

impl PartialEq for StreetGraph {
    fn eq(&self, other: &Self) -> bool {
        self.node_count() == other.node_count()
            && self.edge_count() == other.edge_count()
            && self
                .graph
                .node_weights()
                .eq(other.graph.node_weights())
            && self.graph.raw_edges().iter().zip(other.graph.raw_edges()).all(|(a, b)| {
                a.source() == b.source() && a.target() == b.target() && a.weight == b.weight
            })
    }
}

impl fmt::Debug for StreetGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreetGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}
