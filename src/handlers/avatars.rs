//! Avatar HTTP handlers.
//!
//! This module implements the avatar endpoints:
//! - POST /api/v1/profile/avatar - Upload an image for the caller's profile
//! - GET /api/v1/avatars/{path} - Download a stored avatar image

use crate::{
    AppState,
    error::AppError,
    middleware::auth::AuthContext,
    models::profile::AvatarUploadResponse,
    services::storage,
};
use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};

/// Upload an avatar image.
///
/// The raw request body is the image; the `Content-Type` header names its
/// format. On success the stored file name is written to the caller's
/// profile and returned together with the download route.
///
/// # Errors
///
/// - **400**: missing content type, non-image content type, or empty body
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AvatarUploadResponse>, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::InvalidRequest("Missing Content-Type header".to_string()))?;

    if body.is_empty() {
        return Err(AppError::InvalidRequest("Empty image body".to_string()));
    }

    let path = storage::save_avatar(&state.config.avatar_dir, content_type, &body).await?;

    // The profile may not exist yet for old accounts; create it as needed
    sqlx::query(
        r#"
        INSERT INTO profiles (id, avatar_path, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (id) DO UPDATE SET avatar_path = EXCLUDED.avatar_path, updated_at = NOW()
        "#,
    )
    .bind(auth.user_id)
    .bind(&path)
    .execute(&state.pool)
    .await?;

    Ok(Json(AvatarUploadResponse {
        url: format!("/api/v1/avatars/{path}"),
        path,
    }))
}

/// Download a stored avatar image.
///
/// # Errors
///
/// - **404**: no such file (or a name that could not have been stored)
pub async fn download_avatar(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let (bytes, content_type) = storage::load_avatar(&state.config.avatar_dir, &path).await?;

    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}
