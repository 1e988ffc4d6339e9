//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database/Storage Errors**: Backend failures, hidden from clients
/// - **Authentication Errors**: Missing or invalid sessions, bad credentials
/// - **Reservation Errors**: Conditional update predicates that did not match
/// - **Validation Errors**: Invalid request data, malformed QR payloads
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem operation on the avatar store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// No session token was presented, or it is unknown or expired.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Authentication required")]
    Unauthenticated,

    /// Sign-in failed. Deliberately does not say whether the email or the
    /// password was wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Sign-up attempted with an email that already has an account.
    #[error("Email already registered")]
    EmailTaken,

    /// Requested key does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Key not found")]
    KeyNotFound,

    /// Checkout predicate failed: the key was not available.
    ///
    /// Expected and recoverable; the user simply lost the race.
    #[error("Key is already in use")]
    AlreadyReserved,

    /// Check-in predicate failed: the key was not in use.
    #[error("Key is already available")]
    AlreadyAvailable,

    /// Check-in attempted by a user who is not the current holder.
    #[error("Key is held by another user")]
    NotHolder,

    /// Scanned QR payload did not decode into a key reference.
    #[error("Malformed QR payload")]
    MalformedPayload,

    /// Requested avatar file does not exist.
    #[error("Avatar not found")]
    AvatarNotFound,

    /// Request body or parameters are invalid.
    ///
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                self.to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
            ),
            AppError::EmailTaken => (StatusCode::CONFLICT, "email_taken", self.to_string()),
            AppError::KeyNotFound => (StatusCode::NOT_FOUND, "key_not_found", self.to_string()),
            AppError::AlreadyReserved => {
                (StatusCode::CONFLICT, "already_reserved", self.to_string())
            }
            AppError::AlreadyAvailable => {
                (StatusCode::CONFLICT, "already_available", self.to_string())
            }
            AppError::NotHolder => (StatusCode::FORBIDDEN, "not_holder", self.to_string()),
            AppError::MalformedPayload => (
                StatusCode::BAD_REQUEST,
                "malformed_payload",
                self.to_string(),
            ),
            AppError::AvatarNotFound => {
                (StatusCode::NOT_FOUND, "avatar_not_found", self.to_string())
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Database(ref err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Storage(ref err) => {
                tracing::error!(error = %err, "Storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}
