//! Identity provider integration.
//!
//! The provider is the source of truth for who is logged in. This service
//! never stores passwords or user records of its own; it holds the provider's
//! tokens in the session and asks the provider about them on every request.
//!
//! Two kinds of calls exist:
//! - **User-scoped** calls (`sign_in`, `user_for_token`, ...) authenticate with
//!   the public anon key plus the user's own token.
//! - **Admin** calls (`list_users`, `get_user`, `create_user`) use the
//!   service-role key and are only made from admin-gated handlers.

mod client;
mod error;

pub use client::GoTrueClient;
pub use error::IdentityError;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Serialize;

use jewelry_orders_core::UserId;

use crate::models::SessionTokens;

/// A user known to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: UserId,
    /// Absent for accounts created without an email (e.g. phone sign-up).
    pub email: Option<String>,
}

/// Tokens issued on login or refresh, with the user they belong to.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub tokens: SessionTokens,
    pub user: Identity,
}

/// Result of a sign-up. `session` is `None` when the provider requires email
/// confirmation before the first login.
#[derive(Debug, Clone)]
pub struct Registration {
    pub user: Identity,
    pub session: Option<AuthSession>,
}

/// Operations this service needs from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve an access token to its user.
    ///
    /// Returns [`IdentityError::Rejected`] for expired or revoked tokens.
    async fn user_for_token(&self, access_token: &str) -> Result<Identity, IdentityError>;

    /// Exchange a refresh token for a fresh session.
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, IdentityError>;

    /// Password login.
    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthSession, IdentityError>;

    /// Self-service account creation.
    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Registration, IdentityError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;

    /// One page of all users (1-based `page`).
    async fn list_users(&self, page: u32, per_page: u32) -> Result<Vec<Identity>, IdentityError>;

    /// Look up a single user by id.
    async fn get_user(&self, id: UserId) -> Result<Identity, IdentityError>;

    /// Create a confirmed account without sending any email.
    async fn create_user(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, IdentityError>;
}
