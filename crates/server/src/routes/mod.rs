//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Liveness
//! GET  /health/ready             - Readiness (order store reachable)
//!
//! # Auth
//! POST /auth/login               - Password login, tokens kept in session
//! POST /auth/register            - Sign-up
//! POST /auth/logout              - Revoke and clear session
//!
//! # Customer (any logged-in user)
//! GET  /api/me                   - Current user with is_admin flag
//! GET  /api/orders               - Own orders + summary (seeds samples on first visit)
//!
//! # Admin (allow-listed emails only)
//! GET  /api/admin/orders         - All orders with customer emails
//! POST /api/admin/orders         - Create order, provisioning the customer if needed
//! PUT  /api/admin/orders/{id}    - Edit mutable fields
//! GET  /api/admin/options        - Status, jewelry type, and material vocabularies
//! ```

pub mod api;
pub mod auth;
pub mod health;


use axum::Router;

use crate::state::AppState;

/// Build the complete router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(api::router())
}
