//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (`x-request-id` on span, Sentry scope, and response)
//! 4. Security headers
//! 5. Session layer (tower-sessions, `PostgreSQL` or memory store)
//!
//! Authentication is not a layer: handlers opt in with the [`RequireUser`]
//! and [`RequireAdmin`] extractors.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{CurrentUser, RequireAdmin, RequireUser, set_session_tokens};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer, postgres_store};
