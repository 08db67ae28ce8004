//! JSON service exposing route calculation and geocoding over HTTP

pub mod config;
pub mod error;
pub mod routes;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::{AppState, app};
