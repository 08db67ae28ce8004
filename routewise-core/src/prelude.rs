pub use crate::Error;

// Graph acquisition
pub use crate::loading::{
    CacheKey, CacheStorage, DirectoryStorage, GraphCache, GraphProvider, OverpassProvider,
    RouteConfig, SearchArea,
};
pub use crate::loading::geocode::{Geocoder, NominatimGeocoder};

// Street network model
pub use crate::model::{LatLon, RoadClass, StreetEdge, StreetGraph, StreetNode};

// Search
pub use crate::routing::{
    LoggingObserver, NoopObserver, RouteResult, RouteVariant, SearchObserver,
    dijkstra_path_weights, search, search_with_observer,
};

// Traffic and orchestration
pub use crate::optimizer::{RouteOptimizer, RouteOutcome, VehicleClass};
pub use crate::traffic::{TrafficEstimator, TrafficProfile};

pub use crate::Hour;
pub use crate::Meters;
pub use crate::Minutes;
pub use crate::NodeId;
