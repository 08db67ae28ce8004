use std::sync::Arc;
use std::time::Instant;

use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveTime;
use routewise_core::prelude::*;
use routewise_core::traffic::{PEAK_HOUR, hour_of_day};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower::{ServiceBuilder, limit::GlobalConcurrencyLimitLayer, timeout::error::Elapsed};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{ApiError, ErrorBody};

/// Shared across requests; each request builds its own `RouteOptimizer`
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<GraphCache>,
    pub geocoder: Arc<dyn Geocoder>,
    pub routing: Arc<RouteConfig>,
}

impl AppState {
    pub fn new(cache: GraphCache, geocoder: impl Geocoder + 'static, routing: RouteConfig) -> Self {
        Self {
            cache: Arc::new(cache),
            geocoder: Arc::new(geocoder),
            routing: Arc::new(routing),
        }
    }
}

pub fn app(state: AppState, config: &ServerConfig) -> Router {
    let guards = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .timeout(config.request_timeout())
        .layer(GlobalConcurrencyLimitLayer::new(config.concurrency_limit));

    Router::new()
        .route("/route/calculate", post(calculate_route))
        .route("/route/geocode", post(geocode_location))
        .route("/health", get(health))
        .layer(guards)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<ErrorBody>) {
    if err.is::<Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorBody {
                error: "Request took too long".to_string(),
            }),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: format!("Unhandled internal error: {err}"),
            }),
        )
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn default_route_type() -> String {
    RouteVariant::Shortest.as_str().to_string()
}

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    /// `[lat, lon]`, skips geocoding of `origin`
    pub origin_coords: Option<[f64; 2]>,
    /// `[lat, lon]`, skips geocoding of `destination`
    pub dest_coords: Option<[f64; 2]>,
    #[serde(default = "default_route_type")]
    pub route_type: String,
    /// `HH:MM`, defaults to the evening peak
    pub departure_time: Option<String>,
    pub vehicle: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Endpoint {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub success: bool,
    pub origin: Endpoint,
    pub destination: Endpoint,
    pub distance_km: f64,
    pub path_nodes: usize,
    pub calculation_time_s: f64,
    /// `HH:MM` of `best_hour`
    pub best_departure: String,
    #[serde(flatten)]
    pub route: RouteOutcome,
}

struct Place {
    name: String,
    coords: Option<LatLon>,
}

impl Place {
    fn parse(name: String, coords: Option<[f64; 2]>, what: &str) -> Result<Self, ApiError> {
        let coords = coords.map(|[lat, lon]| LatLon::new(lat, lon));
        if coords.is_some_and(|point| !point.is_valid()) {
            return Err(ApiError::BadRequest(format!("{what} coordinates out of range")));
        }
        let name = name.trim().to_string();
        if name.is_empty() && coords.is_none() {
            return Err(ApiError::BadRequest(
                "Origin and destination are required".to_string(),
            ));
        }
        Ok(Self { name, coords })
    }

    fn resolve(&self, geocoder: &dyn Geocoder) -> Result<LatLon, Error> {
        match self.coords {
            Some(point) => Ok(point),
            None => geocoder.geocode(&self.name),
        }
    }

    fn endpoint(self, point: LatLon) -> Endpoint {
        Endpoint {
            name: self.name,
            lat: point.lat,
            lon: point.lon,
        }
    }
}

/// Validated request, ready to run on a blocking thread
struct RoutePlan {
    origin: Place,
    destination: Place,
    variant: RouteVariant,
    hour: Hour,
    vehicle: VehicleClass,
}

impl RoutePlan {
    fn from_request(request: CalculateRequest) -> Result<Self, ApiError> {
        let origin = Place::parse(request.origin, request.origin_coords, "origin")?;
        let destination = Place::parse(request.destination, request.dest_coords, "destination")?;
        let variant = request.route_type.parse::<RouteVariant>()?;
        let hour = match request.departure_time.as_deref() {
            Some(text) => NaiveTime::parse_from_str(text.trim(), "%H:%M")
                .map(hour_of_day)
                .map_err(|_| {
                    ApiError::BadRequest(format!("departure_time must be HH:MM, got {text:?}"))
                })?,
            None => PEAK_HOUR,
        };
        let vehicle = request
            .vehicle
            .as_deref()
            .map(VehicleClass::from_name)
            .unwrap_or_default();

        Ok(Self {
            origin,
            destination,
            variant,
            hour,
            vehicle,
        })
    }

    fn run(self, state: &AppState) -> Result<CalculateResponse, ApiError> {
        let started = Instant::now();
        let origin = self.origin.resolve(state.geocoder.as_ref())?;
        let destination = self.destination.resolve(state.geocoder.as_ref())?;

        let area = SearchArea::covering(origin, destination, &state.routing);
        let mut optimizer = RouteOptimizer::new(Arc::clone(&state.cache));
        optimizer.load_area(&area)?;
        let mut route =
            optimizer.find_route(origin, destination, self.variant, self.hour, self.vehicle)?;
        route.base_time_min = round_cents(route.base_time_min);
        route.estimated_time_min = round_cents(route.estimated_time_min);
        route.best_time_min = round_cents(route.best_time_min);

        Ok(CalculateResponse {
            success: true,
            origin: self.origin.endpoint(origin),
            destination: self.destination.endpoint(destination),
            distance_km: round_cents(route.distance_m / 1000.0),
            path_nodes: route.path.len(),
            calculation_time_s: (started.elapsed().as_secs_f64() * 1000.0).round() / 1000.0,
            best_departure: route.best_departure().format("%H:%M").to_string(),
            route,
        })
    }
}

/// Two decimal places, as reported to clients
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

async fn calculate_route(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let plan = RoutePlan::from_request(request)?;
    info!(
        "Route request: {:?} -> {:?} ({}, {}:00)",
        plan.origin.name, plan.destination.name, plan.variant, plan.hour
    );

    let response = tokio::task::spawn_blocking(move || plan.run(&state)).await??;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct GeocodeRequest {
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub success: bool,
    pub location: String,
    pub lat: f64,
    pub lon: f64,
}

async fn geocode_location(
    State(state): State<AppState>,
    Json(request): Json<GeocodeRequest>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let location = request.location.trim().to_string();
    if location.is_empty() {
        return Err(ApiError::BadRequest("Location is required".to_string()));
    }
    info!("Geocoding: {location}");

    let geocoder = Arc::clone(&state.geocoder);
    let query = location.clone();
    let point = tokio::task::spawn_blocking(move || geocoder.geocode(&query)).await??;

    Ok(Json(GeocodeResponse {
        success: true,
        location,
        lat: point.lat,
        lon: point.lon,
    }))
}
