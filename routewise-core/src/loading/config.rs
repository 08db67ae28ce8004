use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::Error;

/// Settings for graph acquisition, caching and geocoding
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Directory holding cached graphs, created on demand
    pub graph_cache_dir: PathBuf,
    pub overpass_url: String,
    pub nominatim_url: String,
    /// Sent with every outgoing request, both public APIs require one
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Smallest radius used when planning an area around two points
    pub min_radius_m: u32,
    /// Planned radius is the direct distance times this factor
    pub radius_factor: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            graph_cache_dir: PathBuf::from("./graph_cache"),
            overpass_url: "https://overpass-api.de/api/interpreter".to_string(),
            nominatim_url: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: concat!("routewise/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 180,
            min_radius_m: 3000,
            radius_factor: 1.5,
        }
    }
}

impl RouteConfig {
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.graph_cache_dir = dir.into();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// # Errors
    ///
    /// Returns `Error::Configuration` describing the first invalid setting
    pub fn validate(&self) -> Result<(), Error> {
        if self.graph_cache_dir.as_os_str().is_empty() {
            return Err(Error::Configuration(
                "graph cache directory must not be empty".to_string(),
            ));
        }
        if self.graph_cache_dir.is_file() {
            return Err(Error::Configuration(format!(
                "graph cache path is a file: {}",
                self.graph_cache_dir.display()
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Configuration(
                "request timeout must be positive".to_string(),
            ));
        }
        if !(self.radius_factor.is_finite() && self.radius_factor >= 1.0) {
            return Err(Error::Configuration(format!(
                "radius factor must be at least 1.0, got {}",
                self.radius_factor
            )));
        }
        Ok(())
    }
}
