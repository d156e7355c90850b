//! Customer order listing.

use axum::{Json, Router, extract::State, routing::get};

use crate::error::AppError;
use crate::middleware::RequireUser;
use crate::models::CustomerOrders;
use crate::services::CustomerOrderService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/orders", get(list))
}

/// The caller's own orders with summary counters.
///
/// GET /api/orders
///
/// First-time callers get three sample orders created for them.
#[tracing::instrument(skip_all, fields(user_id = %user.identity.id))]
async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<CustomerOrders>, AppError> {
    let orders = CustomerOrderService::new(state.orders()?)
        .list_or_seed(user.identity.id)
        .await?;

    Ok(Json(CustomerOrders::from(orders)))
}
