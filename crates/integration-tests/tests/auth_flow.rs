//! Integration tests for registration, verification, and password reset.
//!
//! Run with: cargo test -p canineracks-integration-tests -- --ignored

use reqwest::Client;
use serde_json::{Value, json};

use canineracks_integration_tests::{base_url, login, pending_code, test_pool, unique_email};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_login_requires_verification() {
    let client = Client::new();
    let base = base_url();
    let email = unique_email("unverified");

    let resp = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({ "email": email, "password": "hunter-42" }))
        .send()
        .await
        .expect("register failed");
    assert_eq!(resp.status(), 201);

    // Correct credentials, but the email was never verified.
    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "email": email, "password": "hunter-42" }))
        .send()
        .await
        .expect("login failed");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_full_register_verify_login_flow() {
    let client = Client::new();
    let pool = test_pool().await;
    let base = base_url();
    let email = unique_email("flow");

    client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({ "email": email, "password": "hunter-42" }))
        .send()
        .await
        .expect("register failed");

    let code = pending_code(&pool, &email, "register").await;

    let resp = client
        .post(format!("{base}/api/auth/verify-code"))
        .json(&json!({ "email": email, "code": code, "purpose": "register" }))
        .send()
        .await
        .expect("verify failed");
    assert!(resp.status().is_success());

    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "email": email, "password": "hunter-42" }))
        .send()
        .await
        .expect("login failed");
    assert!(resp.status().is_success());

    let body: Value = resp.json().await.expect("login response not JSON");
    assert!(body["access"].is_string());
    assert!(body["refresh"].is_string());
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["user"]["role"], "customer");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_wrong_code_is_rejected() {
    let client = Client::new();
    let base = base_url();
    let email = unique_email("wrong-code");

    client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({ "email": email, "password": "hunter-42" }))
        .send()
        .await
        .expect("register failed");

    let resp = client
        .post(format!("{base}/api/auth/verify-code"))
        .json(&json!({ "email": email, "code": "WRONG", "purpose": "register" }))
        .send()
        .await
        .expect("verify failed");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_password_reset_with_code() {
    let client = Client::new();
    let pool = test_pool().await;
    let base = base_url();
    let email = unique_email("reset");

    // Register and verify.
    client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({ "email": email, "password": "old-password" }))
        .send()
        .await
        .expect("register failed");
    let code = pending_code(&pool, &email, "register").await;
    client
        .post(format!("{base}/api/auth/verify-code"))
        .json(&json!({ "email": email, "code": code, "purpose": "register" }))
        .send()
        .await
        .expect("verify failed");

    // Request a reset code and use it.
    let resp = client
        .post(format!("{base}/api/auth/send-code"))
        .json(&json!({ "email": email, "purpose": "reset" }))
        .send()
        .await
        .expect("send-code failed");
    assert!(resp.status().is_success());

    let code = pending_code(&pool, &email, "reset").await;
    let resp = client
        .post(format!("{base}/api/auth/reset-password"))
        .json(&json!({ "email": email, "code": code, "new_password": "new-password" }))
        .send()
        .await
        .expect("reset failed");
    assert!(resp.status().is_success());

    // Old password is dead, new one works.
    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "email": email, "password": "old-password" }))
        .send()
        .await
        .expect("login failed");
    assert_eq!(resp.status(), 401);

    login(&client, &email, "new-password").await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_products_require_authentication() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/api/products", base_url()))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 401);
}
