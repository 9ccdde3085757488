//! Application error type mapping to HTTP status codes and JSON bodies.
//!
//! Account routes answer failures as `{"message": ...}`; chat routes answer
//! as `{"error": ...}`, with `details` when a dependency failed.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use dnya_types::error::{AuthError, TurnError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Signup, login, or token failures.
    Auth(AuthError),
    /// Conversational turn failures.
    Turn(TurnError),
    /// Missing or rejected bearer token.
    Unauthorized(String),
    /// Bad chat request.
    Validation(String),
    /// Generic internal error; the message is sent to the client.
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        AppError::Turn(e)
    }
}

impl AppError {
    /// Unreadable body on a chat route, answered as a 400 `{"error"}`.
    pub fn invalid_json(rejection: &JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), rejection = %rejection, "invalid JSON body");
        AppError::Validation(rejection.body_text())
    }

    /// Unreadable body on an account route, answered as a 400 `{"message"}`.
    pub fn invalid_account_json(rejection: &JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), rejection = %rejection, "invalid JSON body");
        AppError::Auth(AuthError::Validation(rejection.body_text()))
    }

    fn status_and_body(&self) -> (StatusCode, Value) {
        match self {
            AppError::Auth(AuthError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, json!({ "message": msg }))
            }
            AppError::Auth(AuthError::Conflict) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "User already exists" }),
            ),
            AppError::Auth(AuthError::InvalidCredentials) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Invalid credentials" }),
            ),
            AppError::Auth(AuthError::InvalidToken(_)) | AppError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Invalid or missing token" }),
            ),
            AppError::Auth(e) => {
                tracing::error!(error = %e, "auth request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Server error" }),
                )
            }
            AppError::Turn(TurnError::Validation(msg)) | AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            AppError::Turn(TurnError::Persistence(e)) => {
                tracing::error!(error = %e, "turn aborted: message not stored");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to store message", "details": e.to_string() }),
                )
            }
            AppError::Turn(e @ TurnError::GenerationUnavailable { .. }) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": "AI unavailable", "details": e.to_string() }),
            ),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Unauthorized(reason) = &self {
            tracing::debug!(reason = %reason, "request rejected");
        }
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}
