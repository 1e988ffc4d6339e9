//! Session authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the session token from the Authorization header
//! 2. Hash it and look up an unexpired session in the database
//! 3. Inject the authenticated identity into the request
//! 4. Reject unauthorized requests with HTTP 401

use crate::{
    AppState, error::AppError, models::session::SessionPrincipal,
    services::session_service,
};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Authentication context attached to authenticated requests.
///
/// This struct is inserted into the request's extension map and can be
/// extracted by route handlers to know who made the request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// ID of the authenticated user, used for attribution of reservations
    /// and movements
    pub user_id: Uuid,

    pub email: String,
}

/// Pull the bearer token out of the Authorization header.
///
/// Expected header format:
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// Shared with the signout and refresh handlers, which need the raw token
/// to revoke or rotate the session it names.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthenticated)
}

/// Session authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` header from request
/// 2. Hash the token using SHA-256
/// 3. Query for a matching session that has not expired, joined with the
///    owning user
/// 4. If found: inject `AuthContext` into request, call next handler
/// 5. If not found: return 401 Unauthorized error
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;

    let token_hash = session_service::hash_token(token);

    // Lookup the session, rejecting expired rows in the query itself
    let principal = sqlx::query_as::<_, SessionPrincipal>(
        "SELECT s.user_id, u.email
         FROM sessions s
         JOIN users u ON u.id = s.user_id
         WHERE s.token_hash = $1 AND s.expires_at > NOW()",
    )
    .bind(&token_hash)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::Unauthenticated)?;

    let auth_context = AuthContext {
        user_id: principal.user_id,
        email: principal.email,
    };

    // Route handlers can now extract this using Extension<AuthContext>
    request.extensions_mut().insert(auth_context);

    Ok(next.run(request).await)
}
