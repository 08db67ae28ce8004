//! Data model for road routing
//!
//! Contains the street network graph and the coordinate types shared by the
//! loading, routing and optimizer layers.

pub mod geometry;
pub mod streets;

pub use geometry::{LatLon, haversine};
pub use streets::{IndexedPoint, RoadClass, StreetEdge, StreetGraph, StreetNode};
