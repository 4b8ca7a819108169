//! Common test utilities and helpers.

#![allow(dead_code)]

use std::time::Duration;

use axum_test::TestServer;
use crm_notes::db::{self, DbPool};
use crm_notes::{api, AppState};

/// Create a test database with the schema applied
pub async fn setup_test_db() -> DbPool {
    let pool = db::init_pool(":memory:")
        .await
        .expect("Failed to create test database");
    db::migrate(&pool).await.expect("Failed to run migrations");
    pool
}

/// Insert a contact and return its ID
pub async fn create_test_contact(pool: &DbPool, id: &str, name: &str) -> String {
    db::create_contact(
        pool,
        db::CreateContact {
            id: id.to_string(),
            name: name.to_string(),
            phone: Some("+15550100".to_string()),
            email: Some(format!("{}@example.com", id)),
        },
    )
    .await
    .expect("Failed to create test contact")
    .id
}

/// Insert a user and return its ID
pub async fn create_test_user(pool: &DbPool, id: &str, name: &str) -> String {
    db::create_user(
        pool,
        db::CreateUser {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            name: Some(name.to_string()),
            role: db::UserRole::Member,
        },
    )
    .await
    .expect("Failed to create test user")
    .id
}

/// Build a test server over the full router
pub fn build_test_server(pool: DbPool) -> TestServer {
    let app = api::router(AppState::with_pool(pool), Duration::from_secs(5));
    TestServer::new(app).expect("Failed to create test server")
}
