//! Road routing core: cached road-network graphs, A* search under
//! selectable cost models and a deterministic traffic estimator.

pub mod error;
pub mod loading;
pub mod model;
pub mod optimizer;
pub mod prelude;
pub mod routing;
pub mod traffic;

pub use error::Error;
pub use loading::{CacheKey, GraphCache, RouteConfig, SearchArea};
pub use model::{LatLon, StreetGraph};
pub use optimizer::{RouteOptimizer, RouteOutcome, VehicleClass};
pub use routing::{RouteResult, RouteVariant, search};
pub use traffic::{TrafficEstimator, TrafficProfile};

/// Node identifier assigned by the road-network provider (OSM node id)
pub type NodeId = i64;
/// Distance in meters
pub type Meters = f64;
/// Duration in minutes
pub type Minutes = f64;
/// Hour of day, `0..=23`
pub type Hour = u8;
