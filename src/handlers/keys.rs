//! Key catalog HTTP handlers.
//!
//! This module implements the catalog endpoints:
//! - GET /api/v1/keys - List all keys with their holders
//! - POST /api/v1/keys - Register a new key
//! - GET /api/v1/keys/{id}/qr - Printable QR payload for a key

use crate::{
    AppState,
    error::AppError,
    models::key::{CreateKeyRequest, Key, KeyWithHolder, QrPayload, QrResponse},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// List every key, joined with the current holder's display name.
///
/// # Response (200)
///
/// ```json
/// [
///   {
///     "id": "550e8400-...",
///     "name": "Lab 3",
///     "location": "Bloco B",
///     "status": "in_use",
///     "holder_id": "660e8400-...",
///     "holder_name": "Maria Fagundes"
///   }
/// ]
/// ```
///
/// # Ordering
///
/// Alphabetical by name, the order the hub screen shows them in.
pub async fn list_keys(
    State(state): State<AppState>,
) -> Result<Json<Vec<KeyWithHolder>>, AppError> {
    let keys = sqlx::query_as::<_, KeyWithHolder>(
        r#"
        SELECT k.id, k.name, k.location, k.status, k.holder_id, p.full_name AS holder_name
        FROM keys k
        LEFT JOIN profiles p ON p.id = k.holder_id
        ORDER BY k.name ASC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(keys))
}

/// Register a new key.
///
/// Keys always start available with no holder; the status can only change
/// through the reservation flow afterwards.
///
/// # Errors
///
/// - **400**: empty name or location
pub async fn create_key(
    State(state): State<AppState>,
    Json(request): Json<CreateKeyRequest>,
) -> Result<(StatusCode, Json<Key>), AppError> {
    let name = request.name.trim();
    let location = request.location.trim();
    if name.is_empty() || location.is_empty() {
        return Err(AppError::InvalidRequest(
            "Name and location are required".to_string(),
        ));
    }

    let key = sqlx::query_as::<_, Key>(
        r#"
        INSERT INTO keys (name, location)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(location)
    .fetch_one(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(key)))
}

/// Printable QR payload for a key.
///
/// Returns the exact text to encode into the printed QR label. The scan
/// endpoint decodes the same structure, so printed labels always round
/// trip.
pub async fn key_qr(
    State(state): State<AppState>,
    Path(key_id): Path<Uuid>,
) -> Result<Json<QrResponse>, AppError> {
    let key = sqlx::query_as::<_, Key>("SELECT * FROM keys WHERE id = $1")
        .bind(key_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::KeyNotFound)?;

    Ok(Json(QrResponse {
        payload: QrPayload::for_key(&key).encode(),
    }))
}
