mod args;

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use routewise_core::prelude::*;
use routewise_core::traffic::hour_of_day;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, parse_coordinates};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = RouteConfig::default();
    if let Some(dir) = &args.cache_dir {
        config = config.with_cache_dir(dir);
    }
    config.validate()?;

    let geocoder = NominatimGeocoder::new(&config)?;
    let origin = resolve(&geocoder, &args.from).with_context(|| format!("origin {:?}", args.from))?;
    let destination =
        resolve(&geocoder, &args.to).with_context(|| format!("destination {:?}", args.to))?;

    let area = SearchArea::covering(origin, destination, &config);
    let provider = OverpassProvider::new(&config)?;
    let cache = GraphCache::from_config(&config, Box::new(provider))?;
    let mut optimizer = RouteOptimizer::new(Arc::new(cache));
    optimizer
        .load_area(&area)
        .context("loading the road network")?;

    let hour = hour_of_day(args.depart);
    let vehicle = VehicleClass::from_name(&args.vehicle);

    if args.compare {
        for (variant, outcome) in optimizer.compare_routes(origin, destination, hour, vehicle)? {
            match outcome {
                Ok(outcome) => print_summary(&outcome),
                Err(e) => println!("{variant:>12}: {e}"),
            }
        }
        return Ok(());
    }

    let outcome = optimizer
        .find_route(origin, destination, args.route_type, hour, vehicle)
        .context("finding a route")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_summary(&outcome);
    }

    if let Some(path) = &args.geojson {
        let feature = outcome.to_geojson()?;
        fs::write(path, feature.to_string())
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Route written to {}", path.display());
    }

    Ok(())
}

fn resolve(geocoder: &dyn Geocoder, place: &str) -> Result<LatLon> {
    match parse_coordinates(place) {
        Some(point) => Ok(point),
        None => Ok(geocoder.geocode(place)?),
    }
}

fn print_summary(outcome: &RouteOutcome) {
    println!(
        "{:>12}: {:.2} km, {:.1} min at {:02}:00 ({:.1} min without traffic), best departure {} ({:.1} min)",
        outcome.route_type,
        outcome.distance_m / 1000.0,
        outcome.estimated_time_min,
        outcome.hour,
        outcome.base_time_min,
        outcome.best_departure().format("%H:%M"),
        outcome.best_time_min,
    );
}
