//! Integration tests for CanineRacks.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, run migrations, then the server without SMTP config
//! cargo run -p canineracks-cli -- migrate run
//! cargo run -p canineracks-server
//!
//! # Run integration tests
//! cargo test -p canineracks-integration-tests -- --ignored
//! ```
//!
//! Without SMTP configuration the server logs verification codes instead
//! of sending them; the tests read pending codes straight from the
//! `email_verification` table, so they need the same database the server
//! uses.

use reqwest::Client;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CANINERACKS_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// Connect to the database the server under test is using.
///
/// # Panics
///
/// Panics if `CANINERACKS_DATABASE_URL`/`DATABASE_URL` is unset or the
/// connection fails; these tests cannot run without the database.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("CANINERACKS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("CANINERACKS_DATABASE_URL must be set for integration tests");
    PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database")
}

/// A unique throwaway email for one test run.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@test.canineracks.app", Uuid::new_v4())
}

/// Read the pending verification code for (email, purpose) from the
/// database. The server logs codes instead of emailing them in test
/// setups, so this is how tests complete the flows.
pub async fn pending_code(pool: &PgPool, email: &str, purpose: &str) -> String {
    sqlx::query_scalar::<_, String>(
        "SELECT v.code FROM email_verification v \
         INNER JOIN app_user u ON u.id = v.user_id \
         WHERE u.email = $1 AND v.purpose = $2 \
         ORDER BY v.created_at DESC LIMIT 1",
    )
    .bind(email)
    .bind(purpose)
    .fetch_one(pool)
    .await
    .expect("No pending verification code found")
}

/// Register, verify, and log in a fresh customer account.
///
/// Returns the access token and the account email.
pub async fn signup_customer(client: &Client, pool: &PgPool) -> (String, String) {
    let email = unique_email("customer");
    let base = base_url();

    let resp = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({ "email": email, "password": "hunter-42" }))
        .send()
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), 201, "registration should succeed");

    let code = pending_code(pool, &email, "register").await;
    let resp = client
        .post(format!("{base}/api/auth/verify-code"))
        .json(&json!({ "email": email, "code": code, "purpose": "register" }))
        .send()
        .await
        .expect("verify request failed");
    assert!(resp.status().is_success(), "verification should succeed");

    let token = login(client, &email, "hunter-42").await;
    (token, email)
}

/// Register a fresh account and promote it to inventory manager.
///
/// Promotion happens directly in the database; the public API never
/// creates managers.
pub async fn signup_manager(client: &Client, pool: &PgPool) -> (String, String) {
    let (_, email) = signup_customer(client, pool).await;

    sqlx::query("UPDATE app_user SET role = 'inventory_manager' WHERE email = $1")
        .bind(&email)
        .execute(pool)
        .await
        .expect("failed to promote test account");

    // Log in again so the token carries the manager role.
    let token = login(client, &email, "hunter-42").await;
    (token, email)
}

/// Log in and return the access token.
pub async fn login(client: &Client, email: &str, password: &str) -> String {
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request failed");
    assert!(resp.status().is_success(), "login should succeed");

    let body: Value = resp.json().await.expect("login response is not JSON");
    body["access"]
        .as_str()
        .expect("login response has no access token")
        .to_string()
}

/// Create a product through the API with a manager token.
///
/// Returns the product ID.
pub async fn create_product(
    client: &Client,
    manager_token: &str,
    name: &str,
    quantity: i32,
    product_code: &str,
) -> i64 {
    let resp = client
        .post(format!("{}/api/products", base_url()))
        .bearer_auth(manager_token)
        .json(&json!({
            "name": name,
            "description": "integration test product",
            "quantity": quantity,
            "purchased_price": "100.00",
            "selling_price": "149.50",
            "date_purchased": "2026-08-01",
            "supplier_name": "Test Supplier",
            "main_category": "Food",
            "sub_category": "Dry",
            "product_code": product_code,
        }))
        .send()
        .await
        .expect("create product request failed");
    assert_eq!(resp.status(), 201, "product creation should succeed");

    let body: Value = resp.json().await.expect("product response is not JSON");
    body["id"].as_i64().expect("product response has no id")
}
