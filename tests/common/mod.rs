//! Shared helpers for integration tests.

use keyhub::{
    AppState,
    config::Config,
    db::{self, DbPool},
    handlers::create_router,
};

/// Check if a test database is available via environment variable.
#[allow(dead_code)]
pub fn database_available() -> bool {
    std::env::var("TEST_DATABASE_URL").is_ok()
}

/// Skip test with message if no test database is available.
#[macro_export]
macro_rules! require_database {
    () => {
        if !crate::common::database_available() {
            eprintln!("Skipping: TEST_DATABASE_URL not set");
            return;
        }
    };
}

/// Create a test app over a lazily-connecting pool.
///
/// No database is contacted until a handler actually runs a query, so
/// routing, auth-header and validation paths can be exercised offline.
#[allow(dead_code)]
pub fn create_test_app() -> axum::Router {
    let config = Config::default();
    let pool = db::create_lazy_pool(&config.database_url).expect("valid database url");

    create_router(AppState { pool, config })
}

/// Connect to the test database and bring its schema up to date.
#[allow(dead_code)]
pub async fn test_pool() -> DbPool {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let pool = db::create_pool(&url).await.expect("connect to test database");
    db::run_migrations(&pool).await.expect("run migrations");

    pool
}

/// Create a test app over a live pool.
#[allow(dead_code)]
pub fn create_app_with_pool(pool: DbPool) -> axum::Router {
    create_router(AppState {
        pool,
        config: Config::default(),
    })
}
