//! This module is responsible for acquiring road-network graphs (Overpass),
//! caching them on disk, resolving place names and planning the area a
//! route request needs.

mod area;
mod builder;
mod cache;
mod config;
pub mod geocode;
pub mod osm;

pub use area::SearchArea;
pub use builder::build_street_graph;
pub use cache::{CacheKey, CacheStorage, DirectoryStorage, GraphCache};
pub use config::RouteConfig;
pub use osm::{GraphProvider, OverpassProvider};
