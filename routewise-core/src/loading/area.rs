use serde::Serialize;

use super::config::RouteConfig;
use crate::LatLon;

/// Circular area a graph is fetched for
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchArea {
    pub center: LatLon,
    pub radius_m: u32,
}

impl SearchArea {
    pub fn new(center: LatLon, radius_m: u32) -> Self {
        Self { center, radius_m }
    }

    /// Area centered between two points that leaves room for detours:
    /// the direct distance scaled by `radius_factor`, never below `min_radius_m`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn covering(origin: LatLon, destination: LatLon, config: &RouteConfig) -> Self {
        let direct = origin.distance_to(destination);
        let radius = (direct * config.radius_factor) as u32;
        Self {
            center: origin.midpoint(destination),
            radius_m: radius.max(config.min_radius_m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_trips_get_minimum_radius() {
        let config = RouteConfig::default();
        let area = SearchArea::covering(
            LatLon::new(12.970, 77.590),
            LatLon::new(12.975, 77.595),
            &config,
        );
        assert_eq!(area.radius_m, 3000);
        assert!((area.center.lat - 12.9725).abs() < 1e-9);
    }

    #[test]
    fn long_trips_scale_with_distance() {
        let config = RouteConfig::default();
        let origin = LatLon::new(12.90, 77.50);
        let destination = LatLon::new(13.00, 77.70);
        let area = SearchArea::covering(origin, destination, &config);
        let expected = origin.distance_to(destination) * 1.5;
        assert!((f64::from(area.radius_m) - expected).abs() < 1.0);
    }
}
