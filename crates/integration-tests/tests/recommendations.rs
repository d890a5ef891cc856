//! Integration tests for the recommendation listing.
//!
//! Run with: cargo test -p canineracks-integration-tests -- --ignored

use reqwest::Client;
use serde_json::{Value, json};

use canineracks_integration_tests::{base_url, create_product, signup_customer, signup_manager, test_pool};

async fn recommended_names(client: &Client, token: &str) -> Vec<String> {
    let resp = client
        .get(format!("{}/api/recommendations", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("recommendations request failed");
    assert!(resp.status().is_success());

    let body: Value = resp.json().await.expect("recommendations is not JSON");
    body.as_array()
        .expect("recommendations is not an array")
        .iter()
        .filter_map(|p| p["name"].as_str().map(String::from))
        .collect()
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_recommendations_follow_the_dog_profile() {
    let client = Client::new();
    let pool = test_pool().await;

    let (manager, _) = signup_manager(&client, &pool).await;
    let (customer, _) = signup_customer(&client, &pool).await;

    create_product(&client, &manager, "Puppy Starter", 10, "PUAD-BSSM-HYSH-CO-NOBRJM").await;
    create_product(&client, &manager, "Senior Giant Mix", 10, "SEGI-BSLA-HYLH-WS-BR").await;
    create_product(&client, &manager, "Broken Code", 10, "PUAD-BSSM").await;

    // Blank profile: nothing is recommended.
    let names = recommended_names(&client, &customer).await;
    assert!(names.is_empty(), "blank profile should match nothing: {names:?}");

    let resp = client
        .put(format!("{}/api/dog-profile", base_url()))
        .bearer_auth(&customer)
        .json(&json!({
            "name": "Biscuit",
            "breed": "Beagle",
            "gender": "male",
            "life_stage": "PUPPY",
            "size": "SMALL",
            "coat_type": "SHORT-HAIRED",
            "role": "COMPANION DOGS",
            "health_considerations": "NONE",
        }))
        .send()
        .await
        .expect("profile update failed");
    assert!(resp.status().is_success());

    let names = recommended_names(&client, &customer).await;
    assert!(names.contains(&"Puppy Starter".to_string()));
    assert!(!names.contains(&"Senior Giant Mix".to_string()));
    // Malformed codes are skipped, never recommended.
    assert!(!names.contains(&"Broken Code".to_string()));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_dog_profile_is_created_lazily() {
    let client = Client::new();
    let pool = test_pool().await;

    let (customer, _) = signup_customer(&client, &pool).await;

    let resp = client
        .get(format!("{}/api/dog-profile", base_url()))
        .bearer_auth(&customer)
        .send()
        .await
        .expect("profile request failed");
    assert!(resp.status().is_success());

    let body: Value = resp.json().await.expect("profile is not JSON");
    assert_eq!(body["name"], "");
    assert_eq!(body["life_stage"], "");
}
