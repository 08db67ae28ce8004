//! OSM road-network acquisition

mod overpass;
pub mod raw_types;

pub use overpass::OverpassProvider;

use crate::{Error, StreetGraph, loading::SearchArea};

/// Source of road-network graphs for a circular area
///
/// Implementations perform blocking I/O and are called from `GraphCache` only.
pub trait GraphProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the provider is unreachable or its data is malformed
    fn fetch_graph(&self, area: &SearchArea) -> Result<StreetGraph, Error>;
}
