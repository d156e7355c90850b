//! Login, registration, and logout.
//!
//! Passwords go straight to the identity provider; only the tokens it issues
//! are kept, in the server-side session.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;

use jewelry_orders_core::Email;

use crate::error::AppError;
use crate::identity::{Identity, IdentityError};
use crate::middleware::{CurrentUser, set_session_tokens};
use crate::models::{SessionTokens, session_keys};
use crate::routes::api::json_body;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
}

/// Email and password. Deliberately not `Debug`.
#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    fn split(self) -> Result<(Email, SecretString), AppError> {
        let email = Email::parse(&self.email).map_err(|e| AppError::Validation(e.to_string()))?;
        if self.password.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }
        Ok((email, SecretString::from(self.password)))
    }
}

fn current_user(state: &AppState, identity: Identity) -> CurrentUser {
    let is_admin = state.admins().is_admin(identity.email.as_deref());
    CurrentUser { identity, is_admin }
}

/// Password login.
///
/// POST /auth/login
#[tracing::instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<CurrentUser>, AppError> {
    let (email, password) = json_body(payload)?.split()?;
    let provider = state.identity()?;

    let auth = provider
        .sign_in(email.as_str(), &password)
        .await
        .map_err(|e| match e {
            IdentityError::Rejected => AppError::InvalidCredentials,
            other => AppError::Identity(other),
        })?;

    set_session_tokens(&session, &auth.tokens).await?;
    tracing::info!(user_id = %auth.user.id, "User logged in");

    Ok(Json(current_user(&state, auth.user)))
}

/// Self-service sign-up.
///
/// POST /auth/register
#[tracing::instrument(skip_all)]
async fn register(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<CurrentUser>), AppError> {
    let (email, password) = json_body(payload)?.split()?;
    let provider = state.identity()?;

    let registration = provider
        .sign_up(email.as_str(), &password)
        .await
        .map_err(|e| match e {
            IdentityError::Api { status, .. } if (400..500).contains(&status) => {
                AppError::Validation("Could not register with these credentials".to_string())
            }
            other => AppError::Identity(other),
        })?;

    if let Some(auth) = &registration.session {
        set_session_tokens(&session, &auth.tokens).await?;
    }
    tracing::info!(user_id = %registration.user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(current_user(&state, registration.user)),
    ))
}

/// Revoke the provider session (best effort) and drop ours.
///
/// POST /auth/logout
async fn logout(State(state): State<AppState>, session: Session) -> Result<StatusCode, AppError> {
    let tokens = session
        .get::<SessionTokens>(session_keys::TOKENS)
        .await?;

    if let (Some(tokens), Ok(provider)) = (tokens, state.identity()) {
        if let Err(e) = provider.sign_out(&tokens.access_token).await {
            tracing::warn!(error = %e, "Provider sign-out failed");
        }
    }

    session.flush().await?;
    Ok(StatusCode::NO_CONTENT)
}
