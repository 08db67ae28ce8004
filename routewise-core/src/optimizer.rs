//! Request orchestration: graph loading, snapping, search and traffic

use std::sync::Arc;

use chrono::NaiveTime;
use geo::LineString;
use geojson::{Feature, Geometry};
use log::{debug, info};
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::json;

use crate::loading::{GraphCache, SearchArea};
use crate::model::StreetGraph;
use crate::routing::{RouteVariant, search};
use crate::traffic::{TrafficEstimator, TrafficProfile, validate_hour};
use crate::{Error, Hour, LatLon, Meters, Minutes, NodeId};

/// Vehicle class deciding the average speed used for the baseline time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleClass {
    #[default]
    Car,
    Bike,
    Bus,
    Truck,
    AutoRickshaw,
}

impl VehicleClass {
    /// Unknown names fall back to `Car`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "car" => VehicleClass::Car,
            "bike" | "motorbike" | "motorcycle" => VehicleClass::Bike,
            "bus" => VehicleClass::Bus,
            "truck" => VehicleClass::Truck,
            "auto" | "auto-rickshaw" | "auto_rickshaw" | "rickshaw" => VehicleClass::AutoRickshaw,
            other => {
                debug!("Unknown vehicle class {other:?}, using car speed");
                VehicleClass::Car
            }
        }
    }

    /// Average urban speed in km/h
    pub fn average_speed_kmh(self) -> f64 {
        match self {
            VehicleClass::Car => 40.0,
            VehicleClass::Bike | VehicleClass::Truck => 25.0,
            VehicleClass::Bus => 30.0,
            VehicleClass::AutoRickshaw => 35.0,
        }
    }

    /// Minutes needed for `distance_m` at the average speed
    pub fn base_time(self, distance_m: Meters) -> Minutes {
        distance_m / 1000.0 / self.average_speed_kmh() * 60.0
    }
}

/// Combined route and traffic estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOutcome {
    pub route_type: RouteVariant,
    pub vehicle: VehicleClass,
    /// Provider node ids from origin to destination
    pub path: Vec<NodeId>,
    pub coordinates: Vec<LatLon>,
    pub distance_m: Meters,
    /// Weighted cost under `route_type`, equal to `distance_m` for "shortest"
    pub cost: f64,
    /// Congestion per path node at `hour`
    pub traffic: TrafficProfile,
    pub hour: Hour,
    pub base_time_min: Minutes,
    pub estimated_time_min: Minutes,
    pub best_hour: Hour,
    pub best_time_min: Minutes,
}

impl RouteOutcome {
    pub fn best_departure(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.best_hour), 0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Route as a `GeoJSON` `LineString` feature
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidData` if the feature cannot be assembled
    pub fn to_geojson(&self) -> Result<Feature, Error> {
        let line: LineString<f64> = self
            .coordinates
            .iter()
            .map(|coord| (coord.lon, coord.lat))
            .collect();

        let value = json!({
            "type": "Feature",
            "geometry": Geometry::new((&line).into()),
            "properties": {
                "route_type": self.route_type,
                "vehicle": self.vehicle,
                "distance_m": self.distance_m,
                "hour": self.hour,
                "estimated_time_min": self.estimated_time_min,
                "best_hour": self.best_hour,
                "best_time_min": self.best_time_min,
                "nodes": self.path.len(),
            }
        });

        serde_json::from_value::<Feature>(value).map_err(|e| Error::InvalidData(e.to_string()))
    }
}

/// Per-caller routing context
///
/// Holds the graph loaded for the caller's area; the `GraphCache` behind it
/// can be shared by any number of contexts.
pub struct RouteOptimizer {
    cache: Arc<GraphCache>,
    estimator: TrafficEstimator,
    graph: Option<Arc<StreetGraph>>,
    area: Option<SearchArea>,
}

impl RouteOptimizer {
    pub fn new(cache: Arc<GraphCache>) -> Self {
        Self {
            cache,
            estimator: TrafficEstimator::new(),
            graph: None,
            area: None,
        }
    }

    /// # Errors
    ///
    /// Returns `Error::GraphLoad` if the graph cannot be loaded
    pub fn load_graph(&mut self, center: LatLon, radius_m: u32) -> Result<(), Error> {
        info!(
            "Loading graph centered at ({:.6}, {:.6}) with radius {radius_m} m",
            center.lat, center.lon
        );
        let graph = self.cache.load(center, radius_m)?;
        info!(
            "Graph ready: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        self.graph = Some(graph);
        self.area = Some(SearchArea::new(center, radius_m));
        Ok(())
    }

    /// # Errors
    ///
    /// See [`RouteOptimizer::load_graph`]
    pub fn load_area(&mut self, area: &SearchArea) -> Result<(), Error> {
        self.load_graph(area.center, area.radius_m)
    }

    pub fn graph(&self) -> Option<&Arc<StreetGraph>> {
        self.graph.as_ref()
    }

    pub fn area(&self) -> Option<&SearchArea> {
        self.area.as_ref()
    }

    /// Route between two coordinates with traffic estimates
    ///
    /// # Errors
    ///
    /// Returns `Error::NotLoaded` before `load_graph`, `Error::InvalidHour`
    /// for hours above 23 and any search error unchanged
    pub fn find_route(
        &self,
        origin: LatLon,
        destination: LatLon,
        variant: RouteVariant,
        hour: Hour,
        vehicle: VehicleClass,
    ) -> Result<RouteOutcome, Error> {
        let graph = self.graph.as_ref().ok_or(Error::NotLoaded)?;
        validate_hour(hour)?;
        self.route_on(graph, origin, destination, variant, hour, vehicle)
    }

    /// Every route type for the same request, evaluated in parallel
    ///
    /// # Errors
    ///
    /// Returns `Error::NotLoaded` before `load_graph` and `Error::InvalidHour`
    /// for hours above 23; per-variant failures stay in their entry
    pub fn compare_routes(
        &self,
        origin: LatLon,
        destination: LatLon,
        hour: Hour,
        vehicle: VehicleClass,
    ) -> Result<Vec<(RouteVariant, Result<RouteOutcome, Error>)>, Error> {
        let graph = self.graph.as_ref().ok_or(Error::NotLoaded)?;
        validate_hour(hour)?;

        Ok(RouteVariant::ALL
            .par_iter()
            .map(|&variant| {
                let outcome = self.route_on(graph, origin, destination, variant, hour, vehicle);
                (variant, outcome)
            })
            .collect())
    }

    fn route_on(
        &self,
        graph: &StreetGraph,
        origin: LatLon,
        destination: LatLon,
        variant: RouteVariant,
        hour: Hour,
        vehicle: VehicleClass,
    ) -> Result<RouteOutcome, Error> {
        let start = nearest(graph, origin)?;
        let end = nearest(graph, destination)?;
        debug!(
            "Nearest nodes: start={:?}, end={:?}",
            graph.node_id(start),
            graph.node_id(end)
        );

        let result = search(graph, start, end, variant)?;
        let path = result.node_ids(graph);
        let coordinates = result
            .path
            .iter()
            .filter_map(|&idx| graph.location(idx))
            .map(LatLon::from)
            .collect();

        let base_time = vehicle.base_time(result.distance_m);
        let traffic = self.estimator.congestion(&path, hour)?;
        let estimated_time = self.estimator.adjusted_time(base_time, &traffic);
        let (best_hour, best_time) = self.estimator.best_hour(&path, base_time);

        info!(
            "{variant} route: {:.2} km, {estimated_time:.1} min at {hour}:00, best {best_hour}:00",
            result.distance_m / 1000.0
        );

        Ok(RouteOutcome {
            route_type: variant,
            vehicle,
            path,
            coordinates,
            distance_m: result.distance_m,
            cost: result.cost,
            traffic,
            hour,
            base_time_min: base_time,
            estimated_time_min: estimated_time,
            best_hour,
            best_time_min: best_time,
        })
    }
}

fn nearest(graph: &StreetGraph, point: LatLon) -> Result<NodeIndex, Error> {
    graph.nearest_node(&point.to_point()).ok_or_else(|| {
        Error::LocationNotFound(format!(
            "no road near ({:.6}, {:.6})",
            point.lat, point.lon
        ))
    })
}
