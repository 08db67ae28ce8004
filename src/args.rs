use std::path::PathBuf;

use chrono::NaiveTime;
use clap::Parser;
use routewise_core::RouteVariant;
use routewise_core::prelude::LatLon;

/// Traffic-aware road routing between two places
#[derive(Debug, Parser)]
#[command(name = "routewise", version, about)]
pub struct Args {
    /// Origin: a place name or "lat,lon"
    #[arg(long)]
    pub from: String,

    /// Destination: a place name or "lat,lon"
    #[arg(long)]
    pub to: String,

    /// shortest, cost, fuel, green or traffic_free
    #[arg(long = "route-type", default_value = "shortest")]
    pub route_type: RouteVariant,

    /// Departure time, HH:MM
    #[arg(long, default_value = "17:00", value_parser = parse_departure)]
    pub depart: NaiveTime,

    /// car, bike, bus, truck or auto
    #[arg(long, default_value = "car")]
    pub vehicle: String,

    /// Graph cache directory
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Write the route as a GeoJSON feature
    #[arg(long, value_name = "PATH")]
    pub geojson: Option<PathBuf>,

    /// Evaluate every route type instead of just `--route-type`
    #[arg(long)]
    pub compare: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn parse_departure(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| format!("expected HH:MM, got {value:?}: {e}"))
}

/// `"lat,lon"` as coordinates, anything else is left to the geocoder
pub fn parse_coordinates(value: &str) -> Option<LatLon> {
    let (lat, lon) = value.split_once(',')?;
    let point = LatLon::new(lat.trim().parse().ok()?, lon.trim().parse().ok()?);
    point.is_valid().then_some(point)
}
