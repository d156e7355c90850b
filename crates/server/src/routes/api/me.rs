//! The current caller.

use axum::{Json, Router, routing::get};

use crate::middleware::{CurrentUser, RequireUser};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/me", get(me))
}

/// GET /api/me
///
/// `is_admin` decides whether the client shows the admin panel link. The
/// admin routes check again on their own.
async fn me(RequireUser(user): RequireUser) -> Json<CurrentUser> {
    Json(user)
}
