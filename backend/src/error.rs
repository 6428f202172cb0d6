use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use shared::ApiError;

use crate::provider::ProviderError;
use crate::store::StoreError;

/// Failure taxonomy for a whole search operation.
///
/// Only fatal conditions appear here; per-candidate sub-route failures are
/// handled inside the pipeline and never surface as errors.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("no route found between start and end")]
    NoRouteFound,

    #[error("rate limited by the directions provider")]
    RateLimited,

    #[error("directions provider unreachable: {0}")]
    Network(String),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ProviderError> for SearchError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NoRouteFound => SearchError::NoRouteFound,
            ProviderError::NoAddressFound(addr) => {
                SearchError::InvalidCoordinates(format!("could not geocode \"{addr}\""))
            }
            ProviderError::InvalidCoordinates(msg) => SearchError::InvalidCoordinates(msg),
            ProviderError::RateLimited => SearchError::RateLimited,
            ProviderError::Network(msg) => SearchError::Network(msg),
            ProviderError::Api(msg) => SearchError::Internal(msg),
        }
    }
}

impl SearchError {
    fn code(&self) -> &'static str {
        match self {
            SearchError::Validation(_) => "VALIDATION_ERROR",
            SearchError::InvalidCoordinates(_) => "INVALID_COORDINATES",
            SearchError::NoRouteFound => "NO_ROUTE_FOUND",
            SearchError::RateLimited => "RATE_LIMITED",
            SearchError::Network(_) => "NETWORK_ERROR",
            SearchError::Storage(_) => "DATABASE_ERROR",
            SearchError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            SearchError::Validation(_) | SearchError::InvalidCoordinates(_) => {
                StatusCode::BAD_REQUEST
            }
            SearchError::NoRouteFound => StatusCode::NOT_FOUND,
            SearchError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            SearchError::Network(_) => StatusCode::BAD_GATEWAY,
            SearchError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            SearchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        // Internal detail stays in the logs, not the response body.
        let message = match &self {
            SearchError::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = ApiError {
            code: self.code().to_string(),
            message,
        };
        (self.status(), Json(body)).into_response()
    }
}
