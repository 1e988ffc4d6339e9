//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Performs business logic (database queries, validation)
//! 3. Returns HTTP response (JSON, status code)
//!
//! `create_router` assembles them into the application, so the binary and
//! the integration tests build exactly the same app.

/// Authentication endpoints
pub mod auth;
/// Avatar upload/download endpoints
pub mod avatars;
/// Health check endpoint
pub mod health;
/// Movement history and export endpoints
pub mod history;
/// Key catalog endpoints
pub mod keys;
/// Profile endpoints
pub mod profiles;
/// Checkout flow endpoints
pub mod reservations;

use crate::{AppState, middleware};
use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    // Everything except health and the credential exchanges requires a
    // session
    let authenticated_routes = Router::new()
        // Session management
        .route("/api/v1/auth/signout", post(auth::sign_out))
        .route("/api/v1/auth/session", get(auth::get_session))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        // Profile and avatar
        .route("/api/v1/profile", get(profiles::get_profile))
        .route("/api/v1/profile", put(profiles::update_profile))
        .route("/api/v1/profile/avatar", post(avatars::upload_avatar))
        .route("/api/v1/avatars/{path}", get(avatars::download_avatar))
        // Key catalog
        .route("/api/v1/keys", get(keys::list_keys))
        .route("/api/v1/keys", post(keys::create_key))
        .route("/api/v1/keys/{id}/qr", get(keys::key_qr))
        // Reservation flow
        .route("/api/v1/keys/{id}/checkout", post(reservations::checkout_key))
        .route("/api/v1/keys/{id}/checkin", post(reservations::checkin_key))
        .route("/api/v1/scan", post(reservations::scan))
        // Movement history
        .route("/api/v1/movements", get(history::list_movements))
        .route("/api/v1/movements/export", get(history::export_movements))
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        // Public routes (no authentication required)
        .route("/health", get(health::health_check))
        .route("/api/v1/auth/signup", post(auth::sign_up))
        .route("/api/v1/auth/signin", post(auth::sign_in))
        // Merge authenticated routes
        .merge(authenticated_routes)
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Browser and mobile-web clients call from other origins
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Share state with all handlers via State extraction
        .with_state(state)
}
