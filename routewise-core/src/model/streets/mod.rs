//! Road network model

pub mod components;
pub mod network;

pub use components::{RoadClass, StreetEdge, StreetNode};
pub use network::{IndexedPoint, StreetGraph};
