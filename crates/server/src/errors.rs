use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::Envelope;
use service::errors::{ServiceError, ValidationErrors};
use thiserror::Error;
use tracing::{debug, error};

/// Every way a request can fail, mapped onto status code and envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("request body is not a JSON object: {0}")]
    Decode(String),
    #[error("user '{0}' not found")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(errors) => ApiError::Validation(errors),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                debug!(%errors, "request rejected");
                let body = Envelope::failure_with("Errors occurred during request validation.", errors);
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::Decode(reason) => {
                debug!(%reason, "undecodable body");
                (StatusCode::BAD_REQUEST, Json(Envelope::failure("Could not decode request body."))).into_response()
            }
            ApiError::NotFound(id) => {
                let msg = format!("A user with id '{id}' could not be found.");
                (StatusCode::NOT_FOUND, Json(Envelope::failure(msg))).into_response()
            }
            ApiError::Internal(detail) => {
                error!(error = %detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(Envelope::failure("An internal error occurred."))).into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage setup failed: {0}")]
    Storage(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
