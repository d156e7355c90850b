//! Unified error handling for the HTTP layer.
//!
//! Every failure reaches the client as `{"error": "<message>"}`. Upstream
//! failures (store, identity provider, session backend, missing
//! configuration) are reported to Sentry and answered with a fixed message so
//! provider details never leak.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::identity::IdentityError;

/// Message for requests that need a dependency that is not configured.
pub const CONFIGURATION_MESSAGE: &str = "Server configuration error";

/// Message for callers that are not logged in or not on the admin list.
pub const ADMIN_REQUIRED_MESSAGE: &str = "Unauthorized: Admin access required";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// No valid session, or the session is not allowed here.
    #[error("{0}")]
    Unauthorized(String),

    /// Missing or malformed client input.
    #[error("{0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Login attempt refused by the identity provider.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// A required dependency is not configured.
    #[error("configuration missing: {0}")]
    Configuration(String),

    /// Searching the identity provider for a customer failed.
    #[error("identity lookup failed: {0}")]
    IdentityLookup(#[source] IdentityError),

    /// Provisioning a customer account failed.
    #[error("identity creation failed: {0}")]
    IdentityCreate(#[source] IdentityError),

    /// Any other identity provider failure.
    #[error("identity provider error: {0}")]
    Identity(#[from] IdentityError),

    /// Order store operation failed.
    #[error("order store error: {0}")]
    Store(#[from] RepositoryError),

    /// Session backend failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AppError {
    /// Shorthand for the admin gate's rejection.
    #[must_use]
    pub fn admin_required() -> Self {
        Self::Unauthorized(ADMIN_REQUIRED_MESSAGE.to_string())
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Configuration(_)
            | Self::IdentityLookup(_)
            | Self::IdentityCreate(_)
            | Self::Identity(_)
            | Self::Store(_)
            | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Configuration(_) => CONFIGURATION_MESSAGE.to_string(),
            Self::IdentityLookup(_) => "Failed to find user by email".to_string(),
            Self::IdentityCreate(_) => "Failed to create user account".to_string(),
            Self::Identity(_) => "Identity provider error".to_string(),
            Self::Store(_) => "Order store error".to_string(),
            Self::Session(_) => "Session error".to_string(),
            _ => self.to_string(),
        }
    }

    fn is_upstream(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_upstream() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request failed upstream"
            );
        }

        let status = self.status_code();
        let body = Json(json!({ "error": self.public_message() }));

        (status, body).into_response()
    }
}

/// Set the Sentry user context for the current request.
pub fn set_sentry_user(id: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
