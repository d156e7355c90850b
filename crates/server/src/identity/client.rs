//! REST client for a GoTrue-compatible auth API (Supabase Auth).
//!
//! # API Reference
//!
//! - Base URL: `{SUPABASE_URL}/auth/v1`
//! - Every request carries an `apikey` header (anon or service-role key)
//! - User-scoped calls add `Authorization: Bearer <user access token>`
//! - Admin calls add `Authorization: Bearer <service-role key>`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jewelry_orders_core::{UserId, blank_to_none};

use super::{AuthSession, Identity, IdentityError, IdentityProvider, Registration};
use crate::config::IdentityConfig;
use crate::models::SessionTokens;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Identity provider client.
#[derive(Clone)]
pub struct GoTrueClient {
    inner: Arc<GoTrueClientInner>,
}

struct GoTrueClientInner {
    client: reqwest::Client,
    base_url: String,
    config: IdentityConfig,
}

/// Which key authenticates a request.
#[derive(Clone, Copy)]
enum Key {
    Anon,
    ServiceRole,
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserResponse> for Identity {
    fn from(user: UserResponse) -> Self {
        Self {
            id: UserId::new(user.id),
            email: blank_to_none(user.email),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    user: UserResponse,
}

impl From<TokenResponse> for AuthSession {
    fn from(token: TokenResponse) -> Self {
        Self {
            tokens: SessionTokens {
                access_token: token.access_token,
                refresh_token: token.refresh_token,
            },
            user: token.user.into(),
        }
    }
}

/// Sign-up returns a session when auto-confirm is on, otherwise the bare user.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<UserResponse>,
    #[serde(default)]
    id: Option<Uuid>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserListResponse {
    #[serde(default)]
    users: Vec<UserResponse>,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct CreateUserBody<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
}

// =============================================================================
// Client
// =============================================================================

impl GoTrueClient {
    /// Create a new identity provider client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(GoTrueClientInner {
                client,
                base_url: config.auth_base(),
                config: config.clone(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Attach the `apikey` header and a bearer token.
    ///
    /// Admin calls use the service-role key as the bearer; user calls pass
    /// the user's own token.
    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        key: Key,
        bearer: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let apikey = match key {
            Key::Anon => self.inner.config.anon(),
            Key::ServiceRole => self.inner.config.service_key(),
        };
        let bearer = bearer.unwrap_or(apikey);
        request
            .header("apikey", apikey)
            .header(AUTHORIZATION, format!("Bearer {bearer}"))
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, IdentityError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| IdentityError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Parse an error response.
    ///
    /// 401 and 403 mean the token or key was refused.
    async fn parse_error(response: reqwest::Response) -> IdentityError {
        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return IdentityError::Rejected;
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        IdentityError::Api { status, message }
    }

    /// Token grants answer bad credentials with 400 `invalid_grant`.
    fn grant_rejection(err: IdentityError) -> IdentityError {
        match err {
            IdentityError::Api { status: 400, .. } => IdentityError::Rejected,
            other => other,
        }
    }
}

#[async_trait]
impl IdentityProvider for GoTrueClient {
    async fn user_for_token(&self, access_token: &str) -> Result<Identity, IdentityError> {
        let request = self.inner.client.get(self.url("/user"));
        let response = self
            .authorize(request, Key::Anon, Some(access_token))
            .send()
            .await?;
        let user: UserResponse = Self::handle_response(response).await?;
        Ok(user.into())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, IdentityError> {
        let request = self
            .inner
            .client
            .post(self.url("/token?grant_type=refresh_token"))
            .json(&RefreshGrant { refresh_token });
        let response = self.authorize(request, Key::Anon, None).send().await?;
        let token: TokenResponse = Self::handle_response(response)
            .await
            .map_err(Self::grant_rejection)?;
        Ok(token.into())
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthSession, IdentityError> {
        let request = self
            .inner
            .client
            .post(self.url("/token?grant_type=password"))
            .json(&PasswordGrant {
                email,
                password: password.expose_secret(),
            });
        let response = self.authorize(request, Key::Anon, None).send().await?;
        let token: TokenResponse = Self::handle_response(response)
            .await
            .map_err(Self::grant_rejection)?;
        Ok(token.into())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Registration, IdentityError> {
        let request = self
            .inner
            .client
            .post(self.url("/signup"))
            .json(&PasswordGrant {
                email,
                password: password.expose_secret(),
            });
        let response = self.authorize(request, Key::Anon, None).send().await?;
        let body: SignUpResponse = Self::handle_response(response).await?;

        let user = match (body.user, body.id) {
            (Some(user), _) => Identity::from(user),
            (None, Some(id)) => Identity {
                id: UserId::new(id),
                email: blank_to_none(body.email),
            },
            (None, None) => {
                return Err(IdentityError::Parse(
                    "sign-up response carried no user".to_string(),
                ));
            }
        };

        let session = match (body.access_token, body.refresh_token) {
            (Some(access_token), Some(refresh_token)) => Some(AuthSession {
                tokens: SessionTokens {
                    access_token,
                    refresh_token,
                },
                user: user.clone(),
            }),
            _ => None,
        };

        Ok(Registration { user, session })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let request = self.inner.client.post(self.url("/logout"));
        let response = self
            .authorize(request, Key::Anon, Some(access_token))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }

    async fn list_users(&self, page: u32, per_page: u32) -> Result<Vec<Identity>, IdentityError> {
        let request = self
            .inner
            .client
            .get(self.url(&format!("/admin/users?page={page}&per_page={per_page}")));
        let response = self
            .authorize(request, Key::ServiceRole, None)
            .send()
            .await?;
        let list: UserListResponse = Self::handle_response(response).await?;
        Ok(list.users.into_iter().map(Identity::from).collect())
    }

    async fn get_user(&self, id: UserId) -> Result<Identity, IdentityError> {
        let request = self.inner.client.get(self.url(&format!("/admin/users/{id}")));
        let response = self
            .authorize(request, Key::ServiceRole, None)
            .send()
            .await?;
        let user: UserResponse = Self::handle_response(response).await?;
        Ok(user.into())
    }

    async fn create_user(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, IdentityError> {
        let request = self
            .inner
            .client
            .post(self.url("/admin/users"))
            .json(&CreateUserBody {
                email,
                password: password.expose_secret(),
                email_confirm: true,
            });
        let response = self
            .authorize(request, Key::ServiceRole, None)
            .send()
            .await?;
        let user: UserResponse = Self::handle_response(response).await?;
        Ok(user.into())
    }
}

impl std::fmt::Debug for GoTrueClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoTrueClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_blank_email_is_none() {
        let user: UserResponse = serde_json::from_str(
            r#"{"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "email": "", "phone": "+15550100"}"#,
        )
        .unwrap();
        let identity = Identity::from(user);
        assert_eq!(identity.email, None);
    }

    #[test]
    fn test_sign_up_response_without_session() {
        let body: SignUpResponse = serde_json::from_str(
            r#"{"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "email": "ann@example.com",
                "confirmation_sent_at": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(body.access_token.is_none());
        assert!(body.user.is_none());
        assert_eq!(body.email.as_deref(), Some("ann@example.com"));
    }

    #[test]
    fn test_user_list_tolerates_extra_fields() {
        let list: UserListResponse = serde_json::from_str(
            r#"{"aud": "authenticated", "users": [
                {"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "email": "a@example.com"},
                {"id": "0d7b1e7c-5f7e-4a43-9d0d-8f7a1e2b3c4d"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(list.users.len(), 2);
        assert_eq!(list.users[1].email, None);
    }

    #[test]
    fn test_grant_rejection_maps_bad_request() {
        let err = GoTrueClient::grant_rejection(IdentityError::Api {
            status: 400,
            message: "invalid_grant".to_string(),
        });
        assert!(err.is_rejection());

        let err = GoTrueClient::grant_rejection(IdentityError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(!err.is_rejection());
    }
}
