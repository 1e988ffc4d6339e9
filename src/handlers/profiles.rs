//! Profile HTTP handlers.
//!
//! This module implements the profile endpoints:
//! - GET /api/v1/profile - Fetch the caller's profile
//! - PUT /api/v1/profile - Update the caller's profile

use crate::{
    AppState,
    error::AppError,
    middleware::auth::AuthContext,
    models::profile::{Profile, UpdateProfileRequest},
};
use axum::{Extension, Json, extract::State};

/// Fetch the caller's profile.
///
/// Accounts created before profiles existed get an empty row created on
/// first fetch, so this endpoint never 404s for an authenticated user.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Profile>, AppError> {
    sqlx::query("INSERT INTO profiles (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
        .bind(auth.user_id)
        .execute(&state.pool)
        .await?;

    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
        .bind(auth.user_id)
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(profile))
}

/// Update the caller's profile.
///
/// # Request Body
///
/// ```json
/// {
///   "full_name": "Maria Fagundes",
///   "username": "mfag",
///   "website": "https://example.com"
/// }
/// ```
///
/// Absent fields keep their current value. The upsert is keyed by the
/// authenticated id, so a user can only ever touch their own row.
///
/// # Errors
///
/// - **400**: `website` is present but not a valid http(s) URL
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    if let Some(website) = request.website.as_deref().filter(|w| !w.trim().is_empty()) {
        validate_website(website)?;
    }

    let profile = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (id, full_name, username, website, avatar_path, updated_at)
        VALUES ($1, $2, $3, $4, $5, NOW())
        ON CONFLICT (id) DO UPDATE SET
            full_name = COALESCE(EXCLUDED.full_name, profiles.full_name),
            username = COALESCE(EXCLUDED.username, profiles.username),
            website = COALESCE(EXCLUDED.website, profiles.website),
            avatar_path = COALESCE(EXCLUDED.avatar_path, profiles.avatar_path),
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(auth.user_id)
    .bind(request.full_name.as_deref())
    .bind(request.username.as_deref())
    .bind(request.website.as_deref())
    .bind(request.avatar_path.as_deref())
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(profile))
}

/// Check that a website value parses as an http(s) URL.
fn validate_website(website: &str) -> Result<(), AppError> {
    let parsed = url::Url::parse(website).map_err(|_| {
        AppError::InvalidRequest("Website must be a valid URL".to_string())
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(AppError::InvalidRequest(
            "Website must use http or https".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_and_https_websites_pass() {
        assert!(validate_website("https://example.com").is_ok());
        assert!(validate_website("http://example.com/~maria").is_ok());
    }

    #[test]
    fn other_schemes_and_junk_fail() {
        assert!(validate_website("ftp://example.com").is_err());
        assert!(validate_website("not a url").is_err());
    }
}
