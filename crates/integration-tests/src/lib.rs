//! Live integration tests for the jewelry order service.
//!
//! These drive a running server over HTTP, so they are `#[ignore]`d by
//! default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server against a real database and identity provider
//! cargo run -p jewelry-orders-server
//!
//! # Run integration tests
//! JO_BASE_URL=http://localhost:3000 \
//! JO_ADMIN_EMAIL=owner@shop.com JO_ADMIN_PASSWORD=... \
//!     cargo test -p jewelry-orders-integration-tests -- --ignored
//! ```
//!
//! `JO_ADMIN_EMAIL` must be listed in the server's `ADMIN_EMAILS`.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("JO_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Build `{base_url}{path}`.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url())
}

/// A fresh client that keeps the session cookie between requests.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Log `client` in with a password, returning the `/auth/login` body.
///
/// # Panics
///
/// Panics if the request fails or login is refused.
#[allow(clippy::expect_used)]
pub async fn login(client: &Client, email: &str, password: &str) -> Value {
    let resp = client
        .post(url("/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(resp.status(), StatusCode::OK, "login refused for {email}");
    resp.json().await.expect("Failed to parse login response")
}

/// A client logged in as the configured admin.
///
/// # Panics
///
/// Panics if `JO_ADMIN_EMAIL` or `JO_ADMIN_PASSWORD` is unset, or login fails.
#[allow(clippy::expect_used)]
pub async fn admin_client() -> Client {
    let email = std::env::var("JO_ADMIN_EMAIL").expect("JO_ADMIN_EMAIL must be set");
    let password = std::env::var("JO_ADMIN_PASSWORD").expect("JO_ADMIN_PASSWORD must be set");

    let client = client();
    let me = login(&client, &email, &password).await;
    assert_eq!(me["is_admin"], true, "{email} is not in ADMIN_EMAILS");
    client
}

/// A unique throwaway customer email.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", uuid::Uuid::new_v4().simple())
}
