use thiserror::Error;

use crate::{Hour, NodeId};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Failed to load graph around ({lat:.6}, {lon:.6}) within {radius_m} m: {reason}")]
    GraphLoad {
        lat: f64,
        lon: f64,
        radius_m: u32,
        reason: String,
    },
    #[error("Graph not loaded, call `load_graph` first")]
    NotLoaded,
    #[error("Unknown route type: {0}")]
    UnknownVariant(String),
    #[error("No path found between {start} and {end}")]
    NoPathFound { start: NodeId, end: NodeId },
    #[error("Invalid node index")]
    InvalidNodeIndex,
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    #[error("Hour of day must be within 0..=23, got {0}")]
    InvalidHour(Hour),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::InvalidData(err.to_string())
        } else {
            Error::NetworkError(err.to_string())
        }
    }
}
