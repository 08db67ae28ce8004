use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::Meters;

/// Great-circle distance between two `(lon, lat)` points in meters
pub fn haversine(a: Point<f64>, b: Point<f64>) -> Meters {
    Haversine.distance(a, b)
}

/// Latitude/longitude pair in decimal degrees
///
/// `geo` points are `(x = lon, y = lat)`; this type exists so that callers
/// never have to remember the order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    pub fn distance_to(self, other: LatLon) -> Meters {
        haversine(self.to_point(), other.to_point())
    }

    /// Arithmetic midpoint, good enough for city-scale areas
    pub fn midpoint(self, other: LatLon) -> LatLon {
        LatLon::new((self.lat + other.lat) / 2.0, (self.lon + other.lon) / 2.0)
    }

    pub fn is_valid(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<Point<f64>> for LatLon {
    fn from(point: Point<f64>) -> Self {
        LatLon::new(point.y(), point.x())
    }
}

impl From<LatLon> for Point<f64> {
    fn from(value: LatLon) -> Self {
        value.to_point()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_matches_known_distance() {
        // One thousandth of a degree of latitude is ~111 m
        let a = LatLon::new(12.970, 77.590);
        let b = LatLon::new(12.971, 77.590);
        let dist = a.distance_to(b);
        assert!((dist - 111.2).abs() < 1.0, "got {dist}");
    }

    #[test]
    fn point_conversion_keeps_axis_order() {
        let coord = LatLon::new(12.97, 77.59);
        let point: Point<f64> = coord.into();
        assert_eq!(point.x(), 77.59);
        assert_eq!(point.y(), 12.97);
        assert_eq!(LatLon::from(point), coord);
    }

    #[test]
    fn midpoint_and_validity() {
        let mid = LatLon::new(10.0, 70.0).midpoint(LatLon::new(12.0, 72.0));
        assert_eq!(mid, LatLon::new(11.0, 71.0));
        assert!(mid.is_valid());
        assert!(!LatLon::new(91.0, 0.0).is_valid());
    }
}
