//! JSON API handlers.

pub mod admin_orders;
pub mod me;
pub mod options;
pub mod orders;

use axum::{Json, Router, extract::rejection::JsonRejection};

use crate::error::AppError;
use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(me::router())
        .merge(orders::router())
        .merge(admin_orders::router())
        .merge(options::router())
}

/// Unwrap a JSON body, turning a malformed one into a validation error.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })
}
