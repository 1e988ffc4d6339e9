//! Session principal model for authentication.
//!
//! Sessions are opaque bearer tokens; the database stores only SHA-256
//! digests, so a leaked sessions table cannot be replayed.

use serde::Serialize;
use uuid::Uuid;

/// The row the auth middleware resolves a bearer token to.
///
/// Produced by joining `sessions` with `users` on an unexpired token
/// digest.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SessionPrincipal {
    /// ID of the authenticated user
    pub user_id: Uuid,

    /// Email of the authenticated user
    pub email: String,
}
