//! Authentication extractors.
//!
//! Both extractors resolve the caller on every request: the access token
//! comes from an `Authorization: Bearer` header or, failing that, from the
//! session, and the identity provider is asked who it belongs to. Nothing
//! about the caller (including admin status) is cached between requests.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn admin_only(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
//!     format!("Hello, {}!", admin.id)
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use tower_sessions::Session;

use crate::error::{AppError, set_sentry_user};
use crate::identity::{Identity, IdentityError};
use crate::models::{SessionTokens, session_keys};
use crate::state::AppState;

/// The authenticated caller.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    #[serde(flatten)]
    pub identity: Identity,
    pub is_admin: bool,
}

/// Extractor that requires any authenticated user.
pub struct RequireUser(pub CurrentUser);

/// Extractor that requires a user on the admin allow-list.
///
/// Runs before any body extractor, so a rejected caller never reaches the
/// order store.
pub struct RequireAdmin(pub Identity);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = authenticate(parts, state)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;
        let is_admin = state.admins().is_admin(identity.email.as_deref());

        Ok(Self(CurrentUser { identity, is_admin }))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = authenticate(parts, state)
            .await?
            .ok_or_else(AppError::admin_required)?;

        if !state.admins().is_admin(identity.email.as_deref()) {
            tracing::warn!(user_id = %identity.id, "Non-admin caller refused");
            return Err(AppError::admin_required());
        }

        Ok(Self(identity))
    }
}

/// Resolve the caller, or `None` when there is no usable token.
async fn authenticate(parts: &Parts, state: &AppState) -> Result<Option<Identity>, AppError> {
    let identity = if let Some(token) = bearer_token(&parts.headers) {
        let provider = state.identity()?;
        accept_rejection(provider.user_for_token(token).await)?
    } else if let Some(session) = parts.extensions.get::<Session>() {
        from_session(session, state).await?
    } else {
        None
    };

    if let Some(identity) = &identity {
        set_sentry_user(&identity.id.to_string(), identity.email.as_deref());
    }

    Ok(identity)
}

/// Validate the session's tokens, refreshing once if the access token has
/// expired.
async fn from_session(session: &Session, state: &AppState) -> Result<Option<Identity>, AppError> {
    let Some(tokens) = session
        .get::<SessionTokens>(session_keys::TOKENS)
        .await?
    else {
        return Ok(None);
    };

    let provider = state.identity()?;
    if let Some(identity) = accept_rejection(provider.user_for_token(&tokens.access_token).await)? {
        return Ok(Some(identity));
    }

    if tokens.refresh_token.is_empty() {
        session
            .remove::<SessionTokens>(session_keys::TOKENS)
            .await?;
        return Ok(None);
    }

    match accept_rejection(provider.refresh(&tokens.refresh_token).await)? {
        Some(fresh) => {
            tracing::debug!(user_id = %fresh.user.id, "Session tokens refreshed");
            session.insert(session_keys::TOKENS, &fresh.tokens).await?;
            Ok(Some(fresh.user))
        }
        None => {
            session
                .remove::<SessionTokens>(session_keys::TOKENS)
                .await?;
            Ok(None)
        }
    }
}

/// Treat a provider rejection as "no user" and anything else as a failure.
fn accept_rejection<T>(result: Result<T, IdentityError>) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_rejection() => Ok(None),
        Err(e) => Err(AppError::Identity(e)),
    }
}

/// Token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Store freshly issued tokens in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_session_tokens(
    session: &Session,
    tokens: &SessionTokens,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::TOKENS, tokens).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);
    }
}
