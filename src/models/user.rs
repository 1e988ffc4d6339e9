//! User account models and auth request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. Passwords are never stored; each row keeps a
/// random salt and the salted HMAC-SHA256 digest of the password.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique identifier, referenced by sessions, profiles and keys
    pub id: Uuid,

    pub email: String,

    /// Random per-user salt, hex encoded
    pub password_salt: String,

    /// HMAC-SHA256(salt, password), hex encoded
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

/// Request body for creating an account.
///
/// # JSON Example
///
/// ```json
/// {
///   "email": "maria@example.com",
///   "password": "hunter42",
///   "full_name": "Maria Fagundes",
///   "username": "mfag"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,

    /// Seeds the profile's display name
    pub full_name: String,

    /// Optional profile username
    pub username: Option<String>,
}

/// Request body for signing in.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// The authenticated principal, as exposed to clients.
#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub id: Uuid,
    pub email: String,
}

/// Response body for signup, signin and refresh.
///
/// # JSON Example
///
/// ```json
/// {
///   "token": "f3a1...64 hex chars...",
///   "expires_at": "2025-06-08T10:00:00Z",
///   "user": { "id": "550e8400-...", "email": "maria@example.com" }
/// }
/// ```
///
/// The token is opaque; the server stores only its SHA-256 digest.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: IdentityResponse,
}
