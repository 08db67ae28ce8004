use geo::Point;
use hashbrown::HashMap;
use log::{debug, info};
use petgraph::graph::{DiGraph, NodeIndex};

use super::osm::raw_types::{OsmElement, OsmTags};
use crate::model::{RoadClass, StreetEdge, StreetGraph, StreetNode, haversine};
use crate::{Error, NodeId};

/// Direction(s) a way may be driven in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Oneway {
    No,
    Forward,
    Backward,
}

impl Oneway {
    fn from_tags(tags: &OsmTags) -> Self {
        match tags.oneway.as_deref() {
            Some("yes" | "1" | "true") => Oneway::Forward,
            Some("-1" | "reverse") => Oneway::Backward,
            Some("no" | "false" | "0") => Oneway::No,
            _ if tags.junction.as_deref() == Some("roundabout") => Oneway::Forward,
            _ => Oneway::No,
        }
    }
}

/// Builds a street graph from raw OSM nodes and ways
///
/// Only nodes referenced by a way become graph nodes. Every consecutive node
/// pair of a way yields one directed edge per allowed direction; its length
/// is the great-circle distance between the two nodes.
///
/// # Errors
///
/// Returns `Error::InvalidData` if the elements contain no usable way
pub fn build_street_graph(elements: &[OsmElement]) -> Result<StreetGraph, Error> {
    let coordinates: HashMap<NodeId, Point<f64>> = elements
        .iter()
        .filter(|elem| elem.elem_type == "node")
        .filter_map(|elem| Some((elem.id, Point::new(elem.lon?, elem.lat?))))
        .collect();

    let mut graph = DiGraph::new();
    let mut indices: HashMap<NodeId, NodeIndex> = HashMap::new();
    let mut way_count = 0usize;
    let mut skipped_segments = 0usize;

    for way in elements.iter().filter(|elem| elem.elem_type == "way") {
        let (Some(node_ids), Some(tags)) = (&way.nodes, &way.tags) else {
            continue;
        };
        let Some(highway) = tags.highway.as_deref() else {
            continue;
        };
        let road_class = RoadClass::from_highway(highway);
        let oneway = Oneway::from_tags(tags);

        for pair in node_ids.windows(2) {
            let (Some(&from_point), Some(&to_point)) =
                (coordinates.get(&pair[0]), coordinates.get(&pair[1]))
            else {
                skipped_segments += 1;
                continue;
            };

            let from = *indices.entry(pair[0]).or_insert_with(|| {
                graph.add_node(StreetNode {
                    id: pair[0],
                    geometry: from_point,
                })
            });
            let to = *indices.entry(pair[1]).or_insert_with(|| {
                graph.add_node(StreetNode {
                    id: pair[1],
                    geometry: to_point,
                })
            });

            let edge = StreetEdge::new(haversine(from_point, to_point), road_class);
            match oneway {
                Oneway::Forward => {
                    graph.add_edge(from, to, edge);
                }
                Oneway::Backward => {
                    graph.add_edge(to, from, edge);
                }
                Oneway::No => {
                    graph.add_edge(from, to, edge);
                    graph.add_edge(to, from, edge);
                }
            }
        }
        way_count += 1;
    }

    if graph.edge_count() == 0 {
        return Err(Error::InvalidData(
            "road network response contains no drivable ways".to_string(),
        ));
    }
    if skipped_segments > 0 {
        debug!("Skipped {skipped_segments} segments referencing missing nodes");
    }

    info!(
        "Built graph with {} nodes and {} edges from {} ways",
        graph.node_count(),
        graph.edge_count(),
        way_count
    );

    Ok(StreetGraph::new(graph))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: NodeId, lat: f64, lon: f64) -> OsmElement {
        OsmElement {
            elem_type: "node".to_string(),
            id,
            lat: Some(lat),
            lon: Some(lon),
            nodes: None,
            tags: None,
        }
    }

    fn way(id: NodeId, nodes: Vec<NodeId>, highway: &str, oneway: Option<&str>) -> OsmElement {
        OsmElement {
            elem_type: "way".to_string(),
            id,
            lat: None,
            lon: None,
            nodes: Some(nodes),
            tags: Some(OsmTags {
                highway: Some(highway.to_string()),
                oneway: oneway.map(str::to_string),
                junction: None,
            }),
        }
    }

    #[test]
    fn two_way_street_yields_both_directions() {
        let elements = vec![
            node(1, 12.970, 77.590),
            node(2, 12.971, 77.590),
            node(3, 12.972, 77.590),
            way(100, vec![1, 2, 3], "residential", None),
        ];
        let graph = build_street_graph(&elements).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 4);

        let first = graph.index_of(1).unwrap();
        let second = graph.index_of(2).unwrap();
        assert!(graph.has_edge(first, second));
        assert!(graph.has_edge(second, first));

        let edge = graph.edges(first).next().unwrap();
        assert!((edge.weight().length - 111.2).abs() < 1.0);
        assert_eq!(edge.weight().road_class, RoadClass::Residential);
    }

    #[test]
    fn oneway_tags_are_respected() {
        let elements = vec![
            node(1, 12.970, 77.590),
            node(2, 12.971, 77.590),
            node(3, 12.972, 77.590),
            way(100, vec![1, 2], "primary", Some("yes")),
            way(101, vec![2, 3], "primary", Some("-1")),
        ];
        let graph = build_street_graph(&elements).unwrap();
        let [a, b, c] = [1, 2, 3].map(|id| graph.index_of(id).unwrap());
        assert!(graph.has_edge(a, b));
        assert!(!graph.has_edge(b, a));
        assert!(graph.has_edge(c, b));
        assert!(!graph.has_edge(b, c));
    }

    #[test]
    fn missing_nodes_are_skipped() {
        let elements = vec![
            node(1, 12.970, 77.590),
            node(2, 12.971, 77.590),
            way(100, vec![1, 2, 99], "tertiary", None),
        ];
        let graph = build_street_graph(&elements).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn no_ways_is_invalid() {
        let elements = vec![node(1, 12.970, 77.590)];
        assert!(matches!(
            build_street_graph(&elements),
            Err(Error::InvalidData(_))
        ));
    }
}
