//! Session service - credential digests, token lifecycle, expiry sweeping.
//!
//! Tokens handed to clients are 32 random bytes, hex encoded. The database
//! only ever sees their SHA-256 digest. Passwords are digested with
//! HMAC-SHA256 keyed by a random per-user salt.

use crate::{db::DbPool, error::AppError};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::time::Duration as StdDuration;
use tokio::task::JoinHandle;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Generate an opaque session token.
///
/// 64 hex characters (32 bytes of randomness).
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// Generate a per-user password salt (16 random bytes, hex encoded).
pub fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::random();
    hex::encode(bytes)
}

/// SHA-256 digest of a token, hex encoded.
///
/// This is the value stored in and looked up from the sessions table.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Salted password digest: HMAC-SHA256(salt, password), hex encoded.
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(salt.as_bytes()).expect("HMAC accepts any key length");
    mac.update(password.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Check a presented password against the stored salt and digest.
pub fn verify_password(salt: &str, password: &str, expected_hash: &str) -> bool {
    hash_password(salt, password) == expected_hash
}

/// Issue a new session for a user.
///
/// Returns the plaintext token (shown to the client exactly once) and its
/// expiry.
pub async fn issue_session(
    pool: &DbPool,
    user_id: Uuid,
    ttl_minutes: i64,
) -> Result<(String, DateTime<Utc>), AppError> {
    let token = generate_token();
    let expires_at = Utc::now() + Duration::minutes(ttl_minutes);

    sqlx::query("INSERT INTO sessions (user_id, token_hash, expires_at) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(hash_token(&token))
        .bind(expires_at)
        .execute(pool)
        .await?;

    Ok((token, expires_at))
}

/// Delete the session a token names. Signing out an already-dead token is
/// not an error.
pub async fn revoke_session(pool: &DbPool, token: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(hash_token(token))
        .execute(pool)
        .await?;

    Ok(())
}

/// Rotate a session: retire the presented token and issue a fresh one with
/// a full TTL.
///
/// # Errors
///
/// - `Unauthenticated`: the token is unknown or already expired
pub async fn refresh_session(
    pool: &DbPool,
    token: &str,
    ttl_minutes: i64,
) -> Result<(String, DateTime<Utc>), AppError> {
    // Retiring the old row and learning its owner is a single statement,
    // so two concurrent refreshes of one token cannot both succeed.
    let user_id: Uuid = sqlx::query_scalar(
        "DELETE FROM sessions WHERE token_hash = $1 AND expires_at > NOW() RETURNING user_id",
    )
    .bind(hash_token(token))
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::Unauthenticated)?;

    issue_session(pool, user_id, ttl_minutes).await
}

/// Start the background task that purges expired sessions.
///
/// The task is handed back to the caller; it runs until the returned
/// handle is dropped at process exit. Nothing registers itself globally,
/// the application shell decides when session maintenance starts.
pub fn spawn_expiry_sweeper(pool: DbPool, interval: StdDuration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
                .execute(&pool)
                .await
            {
                Ok(result) if result.rows_affected() > 0 => {
                    tracing::info!(count = result.rows_affected(), "Removed expired sessions");
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::error!(error = %err, "Failed to sweep expired sessions");
                }
            }
        }
    })
}
