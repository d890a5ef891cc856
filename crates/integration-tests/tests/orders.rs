//! Integration tests for order placement and the stock ledger.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running without SMTP config (codes are read from the DB)
//!
//! Run with: cargo test -p canineracks-integration-tests -- --ignored

use reqwest::Client;
use serde_json::{Value, json};

use canineracks_integration_tests::{
    base_url, create_product, signup_customer, signup_manager, test_pool,
};

async fn product_quantity(client: &Client, token: &str, product_id: i64) -> i64 {
    let resp = client
        .get(format!("{}/api/products/{product_id}", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("get product failed");
    let body: Value = resp.json().await.expect("product is not JSON");
    body["quantity"].as_i64().expect("product has no quantity")
}

async fn ledger_len(client: &Client, token: &str, product_id: i64) -> usize {
    let resp = client
        .get(format!("{}/api/products/{product_id}/history", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("get history failed");
    let body: Value = resp.json().await.expect("history is not JSON");
    body.as_array().expect("history is not an array").len()
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_order_decrements_stock_and_appends_ledger() {
    let client = Client::new();
    let pool = test_pool().await;

    let (manager, _) = signup_manager(&client, &pool).await;
    let (customer, _) = signup_customer(&client, &pool).await;

    let product = create_product(&client, &manager, "Kibble", 20, "LI-BS-CT-LS-NO").await;
    // One entry from creation (initial stock-in).
    assert_eq!(ledger_len(&client, &manager, product).await, 1);

    let resp = client
        .post(format!("{}/api/orders", base_url()))
        .bearer_auth(&customer)
        .json(&json!({ "items": [{ "product_id": product, "quantity": 3 }] }))
        .send()
        .await
        .expect("order request failed");
    assert_eq!(resp.status(), 201);

    assert_eq!(product_quantity(&client, &manager, product).await, 17);
    // Creation entry plus the fulfillment stock-out.
    assert_eq!(ledger_len(&client, &manager, product).await, 2);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_insufficient_stock_rejects_order_without_side_effects() {
    let client = Client::new();
    let pool = test_pool().await;

    let (manager, _) = signup_manager(&client, &pool).await;
    let (customer, _) = signup_customer(&client, &pool).await;

    let product = create_product(&client, &manager, "Scarce Treats", 5, "LI-BS-CT-LS-NO").await;
    let ledger_before = ledger_len(&client, &manager, product).await;

    let resp = client
        .post(format!("{}/api/orders", base_url()))
        .bearer_auth(&customer)
        .json(&json!({ "items": [{ "product_id": product, "quantity": 10 }] }))
        .send()
        .await
        .expect("order request failed");

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error is not JSON");
    let message = body["error"].as_str().unwrap_or_default();
    assert!(
        message.contains("Scarce Treats"),
        "error should name the product: {message}"
    );

    // Nothing changed: quantity intact, no new ledger rows, no order.
    assert_eq!(product_quantity(&client, &manager, product).await, 5);
    assert_eq!(ledger_len(&client, &manager, product).await, ledger_before);

    let resp = client
        .get(format!("{}/api/orders", base_url()))
        .bearer_auth(&customer)
        .send()
        .await
        .expect("list orders failed");
    let orders: Value = resp.json().await.expect("orders is not JSON");
    assert_eq!(orders.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_multi_item_order_is_atomic() {
    let client = Client::new();
    let pool = test_pool().await;

    let (manager, _) = signup_manager(&client, &pool).await;
    let (customer, _) = signup_customer(&client, &pool).await;

    let plentiful = create_product(&client, &manager, "Plentiful", 50, "LI-BS-CT-LS-NO").await;
    let scarce = create_product(&client, &manager, "Scarce", 2, "LI-BS-CT-LS-NO").await;

    let resp = client
        .post(format!("{}/api/orders", base_url()))
        .bearer_auth(&customer)
        .json(&json!({ "items": [
            { "product_id": plentiful, "quantity": 10 },
            { "product_id": scarce, "quantity": 5 },
        ]}))
        .send()
        .await
        .expect("order request failed");

    assert_eq!(resp.status(), 400);

    // The first line item's decrement must have been rolled back.
    assert_eq!(product_quantity(&client, &manager, plentiful).await, 50);
    assert_eq!(product_quantity(&client, &manager, scarce).await, 2);
    assert_eq!(ledger_len(&client, &manager, plentiful).await, 1);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_empty_order_is_a_validation_failure() {
    let client = Client::new();
    let pool = test_pool().await;

    let (customer, _) = signup_customer(&client, &pool).await;

    let resp = client
        .post(format!("{}/api/orders", base_url()))
        .bearer_auth(&customer)
        .json(&json!({ "items": [] }))
        .send()
        .await
        .expect("order request failed");

    assert_eq!(resp.status(), 400);
}
