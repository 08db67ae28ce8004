//! Overpass API response structures

use serde::Deserialize;

use crate::NodeId;

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<OsmElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsmElement {
    #[serde(rename = "type")]
    pub elem_type: String,
    pub id: NodeId,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub nodes: Option<Vec<NodeId>>,
    pub tags: Option<OsmTags>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsmTags {
    pub highway: Option<String>,
    pub oneway: Option<String>,
    pub junction: Option<String>,
}
