//! Error types for the recommendation service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::ErrorResponse;

// == Collaborator Error ==
/// Failure reported by the keyword extractor or the recommendation catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// Provider throttled us (HTTP 429)
    #[error("Provider rate limit hit")]
    RateLimited,

    /// Call did not finish within the configured timeout
    #[error("Provider call timed out")]
    Timeout,

    /// Credentials rejected (HTTP 401/403)
    #[error("Provider rejected credentials")]
    Unauthorized,

    /// Resource does not exist (HTTP 404)
    #[error("Provider resource not found")]
    NotFound,

    /// Any other non-success HTTP status
    #[error("Provider returned status {0}")]
    ServiceError(u16),

    /// Could not reach the provider
    #[error("Connection failed: {0}")]
    Connectivity(String),

    /// Response body did not have the expected shape
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl CollaboratorError {
    // == From Status ==
    /// Maps a non-success HTTP status to an error.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => CollaboratorError::Unauthorized,
            404 => CollaboratorError::NotFound,
            429 => CollaboratorError::RateLimited,
            other => CollaboratorError::ServiceError(other),
        }
    }

    // == Is Retryable ==
    /// Transient failures worth another attempt: timeouts, connectivity,
    /// upstream throttling and 5xx responses.
    pub fn is_retryable(&self) -> bool {
        match self {
            CollaboratorError::Timeout
            | CollaboratorError::Connectivity(_)
            | CollaboratorError::RateLimited => true,
            CollaboratorError::ServiceError(status) => *status >= 500,
            CollaboratorError::Unauthorized
            | CollaboratorError::NotFound
            | CollaboratorError::MalformedResponse(_) => false,
        }
    }

    // == Kind ==
    /// Classification reported to callers once retries are exhausted.
    pub fn kind(&self) -> FailureKind {
        match self {
            CollaboratorError::Timeout => FailureKind::Timeout,
            CollaboratorError::Connectivity(_) | CollaboratorError::RateLimited => {
                FailureKind::Connectivity
            }
            CollaboratorError::ServiceError(status) if *status >= 500 => FailureKind::Connectivity,
            CollaboratorError::Unauthorized => FailureKind::Authentication,
            CollaboratorError::ServiceError(_)
            | CollaboratorError::NotFound
            | CollaboratorError::MalformedResponse(_) => FailureKind::Unknown,
        }
    }
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CollaboratorError::Timeout
        } else if err.is_decode() {
            CollaboratorError::MalformedResponse(err.to_string())
        } else if let Some(status) = err.status() {
            CollaboratorError::from_status(status.as_u16())
        } else {
            CollaboratorError::Connectivity(err.to_string())
        }
    }
}

// == Failure Kind ==
/// Coarse failure class surfaced in a failed outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    Connectivity,
    Authentication,
    Unknown,
}

// == Api Error ==
/// Errors raised by the HTTP layer itself.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP layer.
pub type Result<T> = std::result::Result<T, ApiError>;
