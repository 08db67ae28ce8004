use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use routewise_core::{Error, RouteConfig};
use serde::Deserialize;
use tracing::info;

/// Service settings, read from a TOML file
///
/// ```toml
/// bind = "0.0.0.0:8080"
/// request_timeout_secs = 300
/// concurrency_limit = 16
///
/// [routing]
/// graph_cache_dir = "/var/cache/routewise"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Upper bound for one request, graph downloads included
    pub request_timeout_secs: u64,
    /// Requests processed at once; the rest wait
    pub concurrency_limit: usize,
    pub routing: RouteConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            request_timeout_secs: 300,
            concurrency_limit: 16,
            routing: RouteConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads `path` if given and present, defaults otherwise
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for unreadable or invalid files
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml(&text)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `Error::Configuration` if the text is not a valid config
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let config: Self =
            toml::from_str(text).map_err(|e| Error::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `Error::Configuration` describing the first invalid setting
    pub fn validate(&self) -> Result<(), Error> {
        if self.request_timeout_secs == 0 {
            return Err(Error::Configuration(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.concurrency_limit == 0 {
            return Err(Error::Configuration(
                "concurrency_limit must be positive".to_string(),
            ));
        }
        self.routing.validate()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ServerConfig::from_toml(
            r#"
            bind = "0.0.0.0:9000"

            [routing]
            graph_cache_dir = "/tmp/routewise-graphs"
            min_radius_m = 5000
            "#,
        )
        .unwrap();

        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.concurrency_limit, 16);
        assert_eq!(config.routing.min_radius_m, 5000);
        assert_eq!(config.routing.radius_factor, 1.5);
        assert_eq!(
            config.routing.graph_cache_dir,
            Path::new("/tmp/routewise-graphs")
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(ServerConfig::from_toml("concurrency_limit = 0").is_err());
        assert!(ServerConfig::from_toml("bind = \"not an address\"").is_err());
        assert!(ServerConfig::from_toml("[routing]\nradius_factor = 0.5").is_err());
    }

    #[test]
    fn missing_file_means_defaults() {
        let config = ServerConfig::load(Some(Path::new("/nonexistent/routewise.toml"))).unwrap();
        assert_eq!(config.bind, ServerConfig::default().bind);
    }
}
