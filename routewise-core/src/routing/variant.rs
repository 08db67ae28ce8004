use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::Error;
use crate::model::{RoadClass, StreetEdge};

/// Selectable cost model deciding what "optimal" means
///
/// Every variant weighs an edge as `length × factor(road class)` with all
/// factors at least 1.0. Edge lengths are never shorter than the straight
/// line between their endpoints, so the great-circle distance scaled by
/// [`RouteVariant::min_factor`] never overestimates the remaining cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RouteVariant {
    /// Raw edge length
    #[serde(rename = "shortest")]
    Shortest,
    /// Avoids tolled and high-speed roads that cost more to use
    #[serde(rename = "cost")]
    CostEfficient,
    /// Avoids stop-and-go local streets
    #[serde(rename = "fuel")]
    FuelEfficient,
    /// Avoids both high-speed and stop-and-go driving
    #[serde(rename = "green")]
    LowEmission,
    /// Avoids the arterials that carry most congestion
    #[serde(rename = "traffic_free")]
    TrafficAvoiding,
}

impl RouteVariant {
    pub const ALL: [RouteVariant; 5] = [
        RouteVariant::Shortest,
        RouteVariant::CostEfficient,
        RouteVariant::FuelEfficient,
        RouteVariant::LowEmission,
        RouteVariant::TrafficAvoiding,
    ];

    /// Selector used on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            RouteVariant::Shortest => "shortest",
            RouteVariant::CostEfficient => "cost",
            RouteVariant::FuelEfficient => "fuel",
            RouteVariant::LowEmission => "green",
            RouteVariant::TrafficAvoiding => "traffic_free",
        }
    }

    /// Per-meter multiplier for a road class
    pub fn factor(self, class: RoadClass) -> f64 {
        use RoadClass as R;
        match self {
            RouteVariant::Shortest => 1.0,
            RouteVariant::CostEfficient => match class {
                R::Motorway => 1.6,
                R::Trunk => 1.3,
                R::Primary | R::Service | R::Other => 1.1,
                R::Secondary | R::Tertiary => 1.0,
                R::Residential | R::Unclassified => 1.05,
                R::LivingStreet => 1.2,
            },
            RouteVariant::FuelEfficient => match class {
                R::Motorway | R::Trunk => 1.0,
                R::Primary => 1.05,
                R::Secondary => 1.1,
                R::Tertiary => 1.15,
                R::Residential | R::Unclassified | R::Other => 1.3,
                R::Service => 1.4,
                R::LivingStreet => 1.5,
            },
            RouteVariant::LowEmission => match class {
                R::Motorway => 1.25,
                R::Trunk => 1.1,
                R::Primary | R::Secondary => 1.0,
                R::Tertiary => 1.05,
                R::Residential | R::Unclassified => 1.15,
                R::Service | R::LivingStreet | R::Other => 1.2,
            },
            RouteVariant::TrafficAvoiding => match class {
                R::Motorway => 1.3,
                R::Trunk => 1.4,
                R::Primary => 1.5,
                R::Secondary => 1.35,
                R::Tertiary => 1.15,
                R::Residential | R::Service | R::LivingStreet => 1.0,
                R::Unclassified => 1.05,
                R::Other => 1.1,
            },
        }
    }

    /// Cost of traversing `edge` under this variant
    pub fn weight(self, edge: &StreetEdge) -> f64 {
        edge.length * self.factor(edge.road_class)
    }

    /// Smallest factor over all road classes, scales the A* heuristic
    pub fn min_factor(self) -> f64 {
        RoadClass::ALL
            .iter()
            .map(|&class| self.factor(class))
            .fold(f64::INFINITY, f64::min)
    }
}

impl FromStr for RouteVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shortest" => Ok(RouteVariant::Shortest),
            "cost" | "cost-efficient" | "cost_efficient" => Ok(RouteVariant::CostEfficient),
            "fuel" | "fuel-efficient" | "fuel_efficient" => Ok(RouteVariant::FuelEfficient),
            "green" | "low-emission" | "low_emission" => Ok(RouteVariant::LowEmission),
            "traffic_free" | "traffic-free" | "traffic-avoiding" | "traffic_avoiding" => {
                Ok(RouteVariant::TrafficAvoiding)
            }
            _ => Err(Error::UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for RouteVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
