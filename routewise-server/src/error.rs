use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use routewise_core::Error;
use serde::Serialize;
use tokio::task::JoinError;
use tracing::{error, warn};

/// Failure of a request, rendered as `{"error": ...}` with a status code
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or incomplete request
    BadRequest(String),
    Core(Error),
    /// The blocking worker panicked or was cancelled
    Worker(JoinError),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Core(err)
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        ApiError::Worker(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Core(err) => match err {
                Error::LocationNotFound(_) => StatusCode::NOT_FOUND,
                Error::NoPathFound { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                Error::UnknownVariant(_) | Error::InvalidHour(_) => StatusCode::BAD_REQUEST,
                Error::GraphLoad { .. } | Error::NetworkError(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to clients; server-side details stay in the log
    fn public_message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Core(err) => match err {
                Error::LocationNotFound(place) => format!("Could not find location: {place}"),
                Error::NoPathFound { .. } => {
                    "No route available between the given locations".to_string()
                }
                Error::UnknownVariant(_) | Error::InvalidHour(_) => err.to_string(),
                Error::GraphLoad { .. } | Error::NetworkError(_) => {
                    "Road network data is currently unavailable".to_string()
                }
                _ => "An unexpected error occurred".to_string(),
            },
            ApiError::Worker(_) => "An unexpected error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Core(err) if status.is_server_error() => error!("Request failed: {err}"),
            ApiError::Worker(err) => error!("Worker failed: {err}"),
            ApiError::Core(err) => warn!("Request rejected: {err}"),
            ApiError::BadRequest(message) => warn!("Bad request: {message}"),
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
