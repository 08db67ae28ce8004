//! Street network components - nodes, edges and road classes

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::{Meters, NodeId};

/// Street graph node
#[derive(Debug, Clone, PartialEq)]
pub struct StreetNode {
    /// OSM ID of the node
    pub id: NodeId,
    /// Node coordinates
    pub geometry: Point<f64>,
}

/// Street graph edge (directed street segment)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreetEdge {
    /// Segment length in meters
    pub length: Meters,
    /// Road class taken from the OSM `highway` tag
    pub road_class: RoadClass,
}

impl StreetEdge {
    pub fn new(length: Meters, road_class: RoadClass) -> Self {
        Self { length, road_class }
    }
}

/// Coarse road classification used by the non-distance cost variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Unclassified,
    Service,
    LivingStreet,
    Other,
}

impl RoadClass {
    pub const ALL: [RoadClass; 10] = [
        RoadClass::Motorway,
        RoadClass::Trunk,
        RoadClass::Primary,
        RoadClass::Secondary,
        RoadClass::Tertiary,
        RoadClass::Residential,
        RoadClass::Unclassified,
        RoadClass::Service,
        RoadClass::LivingStreet,
        RoadClass::Other,
    ];

    /// Classify an OSM `highway` tag value; `_link` ramps share their parent class
    pub fn from_highway(tag: &str) -> Self {
        match tag.strip_suffix("_link").unwrap_or(tag) {
            "motorway" => RoadClass::Motorway,
            "trunk" => RoadClass::Trunk,
            "primary" => RoadClass::Primary,
            "secondary" => RoadClass::Secondary,
            "tertiary" => RoadClass::Tertiary,
            "residential" => RoadClass::Residential,
            "unclassified" => RoadClass::Unclassified,
            "service" => RoadClass::Service,
            "living_street" => RoadClass::LivingStreet,
            _ => RoadClass::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highway_tags_are_classified() {
        assert_eq!(RoadClass::from_highway("primary"), RoadClass::Primary);
        assert_eq!(RoadClass::from_highway("motorway_link"), RoadClass::Motorway);
        assert_eq!(RoadClass::from_highway("living_street"), RoadClass::LivingStreet);
        assert_eq!(RoadClass::from_highway("track"), RoadClass::Other);
    }
}
