//! Place-name resolution

use log::{info, warn};
use reqwest::blocking::Client;
use serde::Deserialize;

use super::RouteConfig;
use crate::{Error, LatLon};

/// Resolves a free-form place name to coordinates
pub trait Geocoder: Send + Sync {
    /// # Errors
    ///
    /// Returns `Error::LocationNotFound` if the place cannot be resolved
    fn geocode(&self, place: &str) -> Result<LatLon, Error>;
}

/// Geocoder backed by a Nominatim search endpoint
pub struct NominatimGeocoder {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the HTTP client cannot be built
    pub fn new(config: &RouteConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.nominatim_url.clone(),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, place: &str) -> Result<LatLon, Error> {
        let place = place.trim();
        if place.is_empty() {
            return Err(Error::LocationNotFound("empty location".to_string()));
        }

        let response = self
            .client
            .get(&self.url)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()?
            .error_for_status()?;
        let results: Vec<NominatimPlace> = response.json()?;

        let coords = results
            .first()
            .map(parse_place)
            .transpose()?
            .ok_or_else(|| {
                warn!("Geocoding returned no results for {place}");
                Error::LocationNotFound(place.to_string())
            })?;

        info!("Geocoded {place} to ({:.6}, {:.6})", coords.lat, coords.lon);
        Ok(coords)
    }
}

fn parse_place(place: &NominatimPlace) -> Result<LatLon, Error> {
    let lat = place
        .lat
        .parse::<f64>()
        .map_err(|e| Error::InvalidData(format!("latitude {:?}: {e}", place.lat)))?;
    let lon = place
        .lon
        .parse::<f64>()
        .map_err(|e| Error::InvalidData(format!("longitude {:?}: {e}", place.lon)))?;
    Ok(LatLon::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nominatim_payload() {
        let payload = r#"[{"place_id": 1, "lat": "11.0168", "lon": "76.9558", "display_name": "Coimbatore"}]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(payload).unwrap();
        let coords = parse_place(&places[0]).unwrap();
        assert_eq!(coords, LatLon::new(11.0168, 76.9558));
    }

    #[test]
    fn rejects_garbage_coordinates() {
        let place = NominatimPlace {
            lat: "north".to_string(),
            lon: "1.0".to_string(),
        };
        assert!(matches!(parse_place(&place), Err(Error::InvalidData(_))));
    }

    #[test]
    fn empty_place_is_not_found() {
        let geocoder = NominatimGeocoder::new(&RouteConfig::default()).unwrap();
        assert!(matches!(
            geocoder.geocode("   "),
            Err(Error::LocationNotFound(_))
        ));
    }
}
