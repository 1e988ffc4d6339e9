//! Authentication HTTP handlers.
//!
//! This module implements the auth-related API endpoints:
//! - POST /api/v1/auth/signup - Create an account and sign it in
//! - POST /api/v1/auth/signin - Exchange credentials for a session token
//! - POST /api/v1/auth/signout - Revoke the presented session
//! - GET /api/v1/auth/session - Return the authenticated identity
//! - POST /api/v1/auth/refresh - Rotate the session token

use crate::{
    AppState,
    error::AppError,
    middleware::auth::{AuthContext, bearer_token},
    models::user::{IdentityResponse, SessionResponse, SignInRequest, SignUpRequest, User},
    services::session_service,
};
use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};

/// Create a new account.
///
/// # Request Body
///
/// ```json
/// {
///   "email": "maria@example.com",
///   "password": "hunter42",
///   "full_name": "Maria Fagundes",
///   "username": "mfag"
/// }
/// ```
///
/// # Response (201)
///
/// The account is signed in immediately; the response carries the session
/// token, exactly like signin.
///
/// # Errors
///
/// - **400**: missing or invalid fields
/// - **409**: the email already has an account
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::InvalidRequest("A valid email is required".to_string()));
    }
    if request.password.len() < 6 {
        return Err(AppError::InvalidRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    if request.full_name.trim().is_empty() {
        return Err(AppError::InvalidRequest("Full name is required".to_string()));
    }

    let salt = session_service::generate_salt();
    let password_hash = session_service::hash_password(&salt, &request.password);

    // User and profile are created together
    let mut tx = state.pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_salt, password_hash)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(&email)
    .bind(&salt)
    .bind(&password_hash)
    .fetch_one(&mut *tx)
    .await
    .map_err(|err| match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::EmailTaken,
        _ => AppError::Database(err),
    })?;

    sqlx::query("INSERT INTO profiles (id, full_name, username) VALUES ($1, $2, $3)")
        .bind(user.id)
        .bind(request.full_name.trim())
        .bind(request.username.as_deref().map(str::trim))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let (token, expires_at) =
        session_service::issue_session(&state.pool, user.id, state.config.session_ttl_minutes)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            expires_at,
            user: IdentityResponse {
                id: user.id,
                email: user.email,
            },
        }),
    ))
}

/// Exchange email and password for a session token.
///
/// # Errors
///
/// - **401**: unknown email or wrong password, indistinguishably
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(request.email.trim().to_lowercase())
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !session_service::verify_password(
        &user.password_salt,
        &request.password,
        &user.password_hash,
    ) {
        return Err(AppError::InvalidCredentials);
    }

    let (token, expires_at) =
        session_service::issue_session(&state.pool, user.id, state.config.session_ttl_minutes)
            .await?;

    Ok(Json(SessionResponse {
        token,
        expires_at,
        user: IdentityResponse {
            id: user.id,
            email: user.email,
        },
    }))
}

/// Revoke the presented session.
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let token = bearer_token(&headers)?;
    session_service::revoke_session(&state.pool, token).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Return the authenticated identity.
///
/// The client only ever uses the id for attribution; everything else about
/// the user lives in the profile.
pub async fn get_session(
    Extension(auth): Extension<AuthContext>,
) -> Json<IdentityResponse> {
    Json(IdentityResponse {
        id: auth.user_id,
        email: auth.email,
    })
}

/// Rotate the session token and extend its expiry.
///
/// The old token stops working immediately; the response carries the
/// replacement. Clients call this when coming back to the foreground
/// instead of anything refreshing behind their back.
pub async fn refresh(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, AppError> {
    let token = bearer_token(&headers)?;

    let (token, expires_at) =
        session_service::refresh_session(&state.pool, token, state.config.session_ttl_minutes)
            .await?;

    Ok(Json(SessionResponse {
        token,
        expires_at,
        user: IdentityResponse {
            id: auth.user_id,
            email: auth.email,
        },
    }))
}
