use log::{debug, error, info};
use reqwest::blocking::Client;

use super::GraphProvider;
use super::raw_types::OverpassResponse;
use crate::loading::{RouteConfig, SearchArea, build_street_graph};
use crate::{Error, StreetGraph};

/// Highway values making up the drivable network
const DRIVE_HIGHWAYS: &str = "^(motorway|motorway_link|trunk|trunk_link|primary|primary_link|\
secondary|secondary_link|tertiary|tertiary_link|residential|unclassified|service|living_street)$";

/// Downloads drivable roads from an Overpass API endpoint
pub struct OverpassProvider {
    client: Client,
    url: String,
}

impl OverpassProvider {
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
            url: config.overpass_url.clone(),
        })
    }

    fn query(area: &SearchArea) -> String {
        format!(
            "[out:json][timeout:180];\n\
             (way[\"highway\"~\"{DRIVE_HIGHWAYS}\"][\"access\"!~\"^(private|no)$\"]\
             (around:{},{},{}););\n\
             (._;>;);\nout body;",
            area.radius_m, area.center.lat, area.center.lon
        )
    }
}

impl GraphProvider for OverpassProvider {
    fn fetch_graph(&self, area: &SearchArea) -> Result<StreetGraph, Error> {
        let query = Self::query(area);
        debug!("Overpass query:\n{query}");
        info!(
            "Downloading road network for ({:.6}, {:.6}) within {} m",
            area.center.lat, area.center.lon, area.radius_m
        );

        let response = self
            .client
            .post(&self.url)
            .form(&[("data", query)])
            .send()
            .map_err(|e| {
                error!("Overpass request failed: {e}");
                Error::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::NetworkError(format!(
                "Overpass API returned status {status}"
            )));
        }

        let osm: OverpassResponse = response.json()?;
        info!("Downloaded {} OSM elements", osm.elements.len());

        build_street_graph(&osm.elements)
    }
}
