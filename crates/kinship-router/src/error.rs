//! Translation of domain errors into HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use kinship_domain::KinshipError;
use serde::{Deserialize, Serialize};

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error kind
    pub kind: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Error from the relationship services
    Domain(KinshipError),
    /// Malformed path or query parameter
    BadRequest(String),
    /// Internal server error
    Internal(String),
}

/// HTTP status for a domain error
pub fn status_for(err: &KinshipError) -> StatusCode {
    match err {
        KinshipError::InvalidType(_) => StatusCode::UNPROCESSABLE_ENTITY,
        KinshipError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        KinshipError::NotFound(_) => StatusCode::NOT_FOUND,
        KinshipError::Conflict { .. }
        | KinshipError::Duplicate(_)
        | KinshipError::AlreadyResolved(_) => StatusCode::CONFLICT,
        KinshipError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::Domain(e) => {
                let status = status_for(&e);
                if status.is_server_error() {
                    tracing::error!(error = %e, "Request failed");
                }
                (status, e.kind(), e.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_input", msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg)
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            kind: kind.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<KinshipError> for AppError {
    fn from(e: KinshipError) -> Self {
        AppError::Domain(e)
    }
}
