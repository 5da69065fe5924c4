//! Authentication error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Message returned for every bearer-token rejection.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: Missing or invalid token";

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

/// Login failures. Messages are generic so that a wrong username and a
/// wrong password look the same to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Username or password missing
    Validation,
    /// Username or password does not match
    InvalidCredentials,
    /// Token could not be signed
    Internal,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AuthError::Validation => "Username and password are required",
            AuthError::InvalidCredentials => "Invalid username or password",
            AuthError::Internal => "Failed to issue token",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}

/// Request gate rejection. The variants only exist for logging; the
/// response is identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    /// No `Authorization: Bearer ...` header
    MissingToken,
    /// Token failed verification
    InvalidToken,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: UNAUTHORIZED_MESSAGE,
            }),
        )
            .into_response()
    }
}
