//! Integration tests for the customer order view.
//!
//! Registers a throwaway account, so the identity provider must allow
//! sign-ups without email confirmation.
//!
//! Run with: cargo test -p jewelry-orders-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use jewelry_orders_integration_tests::{client, unique_email, url};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_health() {
    let resp = client().get(url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_orders_require_login() {
    let resp = client().get(url("/api/orders")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and identity provider with open sign-ups"]
async fn test_new_customer_is_seeded_once() {
    let client = client();
    let resp = client
        .post(url("/auth/register"))
        .json(&json!({ "email": unique_email(), "password": "Correct-Horse-42!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let first: Value = client
        .get(url("/api/orders"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["summary"], json!({ "total": 3, "in_production": 1, "completed": 1 }));

    let second: Value = client
        .get(url("/api/orders"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["orders"].as_array().unwrap().len(), 3);

    let resp = client.post(url("/auth/logout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
