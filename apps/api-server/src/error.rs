//! Server error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use data_store::StoreError;
use protocol::ApiEnvelope;

/// Server error type.
///
/// Errors propagate unchanged from the services; this type's only transport
/// job is mapping each kind to a status code and the response envelope.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Request failed validation.
    #[error("{0}")]
    Validation(String),

    /// Resource not found, or not visible to the requester.
    #[error("{0}")]
    NotFound(String),

    /// Credentials rejected.
    #[error("{0}")]
    Unauthorized(String),

    /// Authentication required.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication error.
    #[error("Auth error: {0}")]
    Auth(#[from] auth::AuthError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Returns the HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Unauthorized(_) | ServerError::AuthenticationRequired => {
                StatusCode::UNAUTHORIZED
            }
            ServerError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ServerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Auth(_) => StatusCode::UNAUTHORIZED,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        (status, Json(ApiEnvelope::error(message))).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
