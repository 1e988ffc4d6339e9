//! Reservation service - Core logic for checking keys out and back in.
//!
//! Both operations are a conditional state transition on the key row plus
//! an appended movement record, executed inside a single database
//! transaction.
//!
//! # Concurrency Guarantees
//!
//! The `WHERE status = ...` predicate on the UPDATE is the only mutual
//! exclusion in the system. Postgres applies the predicated update
//! atomically, so of two racing checkouts exactly one sees a row updated;
//! the other observes zero rows affected and is told the key is taken. No
//! client-side locking, retries or backoff exist anywhere in this flow.
//!
//! # Atomicity Guarantees
//!
//! The movement insert commits together with the status update. If the
//! insert fails, the transition rolls back, so the key state and the audit
//! log cannot diverge. A useful consequence: the movements of any single
//! key always alternate checkout/check-in, because every committed row
//! corresponds to exactly one edge of the two-state machine.

use crate::{
    db::DbPool,
    error::AppError,
    models::key::{Key, KeyStatus},
    models::movement::Movement,
};
use uuid::Uuid;

/// Check a key out to a user.
///
/// # Process
///
/// 1. Start database transaction
/// 2. Conditionally flip the key to in-use, only if currently available
/// 3. On zero rows: roll back and report why (missing vs. already taken)
/// 4. Record the checkout movement
/// 5. Commit
///
/// # Errors
///
/// - `KeyNotFound`: no key with this id exists
/// - `AlreadyReserved`: the key was not available; no movement is written
/// - `Database`: database error occurred
pub async fn checkout(pool: &DbPool, key_id: Uuid, user_id: Uuid) -> Result<Movement, AppError> {
    let mut tx = pool.begin().await?;

    // The predicate is the whole concurrency story: of two racing
    // checkouts, Postgres lets exactly one match the row.
    let updated = sqlx::query(
        r#"
        UPDATE keys
        SET status = 'in_use',
            holder_id = $1,
            updated_at = NOW()
        WHERE id = $2 AND status = 'available'
        "#,
    )
    .bind(user_id)
    .bind(key_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated == 0 {
        tx.rollback().await?;

        // Distinguish a missing key from a contended one
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM keys WHERE id = $1)")
            .bind(key_id)
            .fetch_one(pool)
            .await?;

        return Err(if exists {
            AppError::AlreadyReserved
        } else {
            AppError::KeyNotFound
        });
    }

    // Record the movement in the same transaction
    let movement = sqlx::query_as::<_, Movement>(
        r#"
        INSERT INTO key_movements (key_id, user_id, action)
        VALUES ($1, $2, 'checkout')
        RETURNING *
        "#,
    )
    .bind(key_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    // Commit state change and audit row atomically
    tx.commit().await?;

    Ok(movement)
}

/// Return a key, releasing it back to available.
///
/// The holder check is part of the UPDATE predicate, so ownership is
/// verified atomically against the same row version the write applies to.
/// The follow-up read only decides which error to report.
///
/// # Errors
///
/// - `KeyNotFound`: no key with this id exists
/// - `AlreadyAvailable`: the key was not in use
/// - `NotHolder`: the key is in use but held by someone else
/// - `Database`: database error occurred
pub async fn checkin(pool: &DbPool, key_id: Uuid, user_id: Uuid) -> Result<Movement, AppError> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE keys
        SET status = 'available',
            holder_id = NULL,
            updated_at = NOW()
        WHERE id = $1 AND status = 'in_use' AND holder_id = $2
        "#,
    )
    .bind(key_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated == 0 {
        tx.rollback().await?;

        let key = sqlx::query_as::<_, Key>("SELECT * FROM keys WHERE id = $1")
            .bind(key_id)
            .fetch_optional(pool)
            .await?;

        return Err(match key {
            None => AppError::KeyNotFound,
            Some(key) if key.status == KeyStatus::Available => AppError::AlreadyAvailable,
            Some(_) => AppError::NotHolder,
        });
    }

    let movement = sqlx::query_as::<_, Movement>(
        r#"
        INSERT INTO key_movements (key_id, user_id, action)
        VALUES ($1, $2, 'checkin')
        RETURNING *
        "#,
    )
    .bind(key_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(movement)
}
