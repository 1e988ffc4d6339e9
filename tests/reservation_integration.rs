//! Reservation flow integration tests.
//!
//! These need a live PostgreSQL database; set TEST_DATABASE_URL to run
//! them. Each test creates its own users and keys, so they can run
//! concurrently against a shared database.

use keyhub::{
    db::DbPool,
    error::AppError,
    models::key::{Key, KeyStatus},
    models::movement::{Movement, MovementAction},
    services::report_service::{self, HistoryFilter},
    services::reservation_service,
};
use uuid::Uuid;

mod common;

/// Insert a user with a profile and return its id.
async fn create_user(pool: &DbPool, full_name: &str) -> Uuid {
    let email = format!("user-{}@example.com", Uuid::new_v4());
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (email, password_salt, password_hash) VALUES ($1, 'salt', 'hash') RETURNING id",
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO profiles (id, full_name) VALUES ($1, $2)")
        .bind(id)
        .bind(full_name)
        .execute(pool)
        .await
        .unwrap();

    id
}

/// Insert an available key and return its id.
async fn create_key(pool: &DbPool, name: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO keys (name, location) VALUES ($1, 'Bloco B') RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn fetch_key(pool: &DbPool, key_id: Uuid) -> Key {
    sqlx::query_as("SELECT * FROM keys WHERE id = $1")
        .bind(key_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Movements of one key, oldest first.
async fn movements_for(pool: &DbPool, key_id: Uuid) -> Vec<Movement> {
    sqlx::query_as("SELECT * FROM key_movements WHERE key_id = $1 ORDER BY created_at ASC")
        .bind(key_id)
        .fetch_all(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn checkout_checkin_round_trip() {
    require_database!();
    let pool = common::test_pool().await;

    let user = create_user(&pool, "Maria Round Trip").await;
    let key_id = create_key(&pool, "Lab 3").await;

    // Checkout flips the key to in-use, held by the user
    reservation_service::checkout(&pool, key_id, user).await.unwrap();
    let key = fetch_key(&pool, key_id).await;
    assert_eq!(key.status, KeyStatus::InUse);
    assert_eq!(key.holder_id, Some(user));

    // Check-in restores the original state
    reservation_service::checkin(&pool, key_id, user).await.unwrap();
    let key = fetch_key(&pool, key_id).await;
    assert_eq!(key.status, KeyStatus::Available);
    assert_eq!(key.holder_id, None);

    // Exactly two movements, checkout then check-in, in time order
    let movements = movements_for(&pool, key_id).await;
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].action, MovementAction::Checkout);
    assert_eq!(movements[1].action, MovementAction::Checkin);
    assert!(movements[0].created_at <= movements[1].created_at);
    assert_eq!(movements[0].user_id, Some(user));
}

#[tokio::test]
async fn second_checkout_is_rejected_without_a_movement() {
    require_database!();
    let pool = common::test_pool().await;

    let first = create_user(&pool, "First User").await;
    let second = create_user(&pool, "Second User").await;
    let key_id = create_key(&pool, "Sala 12").await;

    reservation_service::checkout(&pool, key_id, first).await.unwrap();

    let err = reservation_service::checkout(&pool, key_id, second)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyReserved));

    // The loser changed nothing: still held by the winner, one movement
    let key = fetch_key(&pool, key_id).await;
    assert_eq!(key.holder_id, Some(first));
    assert_eq!(movements_for(&pool, key_id).await.len(), 1);
}

#[tokio::test]
async fn concurrent_checkouts_pick_exactly_one_winner() {
    require_database!();
    let pool = common::test_pool().await;

    let a = create_user(&pool, "Racer A").await;
    let b = create_user(&pool, "Racer B").await;
    let key_id = create_key(&pool, "Almoxarifado").await;

    let (first, second) = tokio::join!(
        reservation_service::checkout(&pool, key_id, a),
        reservation_service::checkout(&pool, key_id, b),
    );

    let winners = [first.is_ok(), second.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(winners, 1, "exactly one checkout must succeed");

    let loser_err = if first.is_err() {
        first.unwrap_err()
    } else {
        second.unwrap_err()
    };
    assert!(matches!(loser_err, AppError::AlreadyReserved));

    // Only the winner left a movement
    assert_eq!(movements_for(&pool, key_id).await.len(), 1);

    let key = fetch_key(&pool, key_id).await;
    assert_eq!(key.status, KeyStatus::InUse);
    assert!(key.holder_id == Some(a) || key.holder_id == Some(b));
}

#[tokio::test]
async fn checkin_by_non_holder_fails_and_changes_nothing() {
    require_database!();
    let pool = common::test_pool().await;

    let holder = create_user(&pool, "Holder").await;
    let other = create_user(&pool, "Someone Else").await;
    let key_id = create_key(&pool, "Biblioteca").await;

    reservation_service::checkout(&pool, key_id, holder).await.unwrap();

    let err = reservation_service::checkin(&pool, key_id, other)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotHolder));

    let key = fetch_key(&pool, key_id).await;
    assert_eq!(key.status, KeyStatus::InUse);
    assert_eq!(key.holder_id, Some(holder));
    assert_eq!(movements_for(&pool, key_id).await.len(), 1);
}

#[tokio::test]
async fn checkin_of_available_key_fails() {
    require_database!();
    let pool = common::test_pool().await;

    let user = create_user(&pool, "Eager Returner").await;
    let key_id = create_key(&pool, "Sala 1").await;

    let err = reservation_service::checkin(&pool, key_id, user)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyAvailable));
    assert!(movements_for(&pool, key_id).await.is_empty());
}

#[tokio::test]
async fn unknown_key_is_not_found() {
    require_database!();
    let pool = common::test_pool().await;

    let user = create_user(&pool, "Lost User").await;

    let err = reservation_service::checkout(&pool, Uuid::new_v4(), user)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::KeyNotFound));

    let err = reservation_service::checkin(&pool, Uuid::new_v4(), user)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::KeyNotFound));
}

#[tokio::test]
async fn history_filters_by_holder_and_date() {
    require_database!();
    let pool = common::test_pool().await;

    // Unique name so this test sees only its own rows
    let marker = Uuid::new_v4().simple().to_string();
    let full_name = format!("Histórico {marker}");
    let user = create_user(&pool, &full_name).await;
    let key_id = create_key(&pool, "Sala de Reuniões").await;

    reservation_service::checkout(&pool, key_id, user).await.unwrap();
    reservation_service::checkin(&pool, key_id, user).await.unwrap();

    // Substring match on the holder name finds both movements
    let filter = HistoryFilter {
        holder: Some(marker.clone()),
        ..Default::default()
    };
    let records = report_service::fetch_movements(&pool, &filter).await.unwrap();
    assert_eq!(records.len(), 2);
    // Newest first
    assert_eq!(records[0].action, MovementAction::Checkin);
    assert_eq!(records[0].key_name.as_deref(), Some("Sala de Reuniões"));
    assert_eq!(records[0].holder_name.as_deref(), Some(full_name.as_str()));

    // The export has one line per movement plus the header
    let csv = report_service::to_csv(&records);
    assert_eq!(csv.lines().count(), records.len() + 1);
    assert_eq!(csv.lines().next().unwrap(), "Chave,Usuário,Ação,Data/Hora");

    // A date range entirely in the past matches nothing, without error
    let query = keyhub::models::movement::HistoryQuery {
        start_date: Some("2000-01-01".to_string()),
        end_date: Some("2000-01-02".to_string()),
        holder: Some(marker),
    };
    let filter = HistoryFilter::from_query(&query).unwrap();
    let records = report_service::fetch_movements(&pool, &filter).await.unwrap();
    assert!(records.is_empty());
}
