//! Reservation HTTP handlers.
//!
//! This module implements the checkout flow endpoints:
//! - POST /api/v1/keys/{id}/checkout - Take a key
//! - POST /api/v1/keys/{id}/checkin - Return a key
//! - POST /api/v1/scan - Decode a QR payload into a confirmation preview

use crate::{
    AppState,
    error::AppError,
    middleware::auth::AuthContext,
    models::key::{KeyWithHolder, QrPayload, ScanPreview, ScanRequest},
    models::movement::Movement,
    services::reservation_service,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

/// Check a key out to the authenticated user.
///
/// # Response (200)
///
/// The recorded checkout movement.
///
/// # Errors
///
/// - **404**: no such key
/// - **409**: the key is already in use (somebody else was faster; the
///   caller just re-fetches the list and tries another key)
pub async fn checkout_key(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(key_id): Path<Uuid>,
) -> Result<Json<Movement>, AppError> {
    let movement = reservation_service::checkout(&state.pool, key_id, auth.user_id).await?;

    Ok(Json(movement))
}

/// Return a key held by the authenticated user.
///
/// # Errors
///
/// - **404**: no such key
/// - **409**: the key is already available
/// - **403**: the key is held by someone else
pub async fn checkin_key(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(key_id): Path<Uuid>,
) -> Result<Json<Movement>, AppError> {
    let movement = reservation_service::checkin(&state.pool, key_id, auth.user_id).await?;

    Ok(Json(movement))
}

/// Decode a scanned QR payload into a confirmation preview.
///
/// The payload is parsed before anything touches the database, so junk
/// scans are rejected without a round trip. On success the key's current
/// status and holder are re-fetched; the client shows them and, on
/// confirmation, calls the checkout endpoint. Cancelling is simply not
/// calling it; scanning has no side effects.
///
/// # Errors
///
/// - **400**: the payload does not decode into a key reference
/// - **404**: the referenced key does not exist
pub async fn scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ScanPreview>, AppError> {
    let payload = QrPayload::parse(&request.payload)?;

    let key = sqlx::query_as::<_, KeyWithHolder>(
        r#"
        SELECT k.id, k.name, k.location, k.status, k.holder_id, p.full_name AS holder_name
        FROM keys k
        LEFT JOIN profiles p ON p.id = k.holder_id
        WHERE k.id = $1
        "#,
    )
    .bind(payload.id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::KeyNotFound)?;

    Ok(Json(ScanPreview {
        key_id: key.id,
        name: key.name,
        location: key.location,
        status: key.status,
        holder_name: key.holder_name,
    }))
}
