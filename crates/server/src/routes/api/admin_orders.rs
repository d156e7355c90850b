//! Admin order management.
//!
//! Every handler takes [`RequireAdmin`] ahead of its body, so callers off
//! the allow-list are turned away before the store is touched.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, put},
};

use jewelry_orders_core::OrderPatch;

use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::{AdminOrderView, CreateOrderRequest};
use crate::routes::api::json_body;
use crate::services::{AdminOrderService, CustomerDirectory};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/orders", get(list).post(create))
        .route("/api/admin/orders/{id}", put(update))
}

fn service(state: &AppState) -> Result<AdminOrderService<'_>, AppError> {
    Ok(AdminOrderService::new(
        state.orders()?,
        CustomerDirectory::new(state.identity()?),
    ))
}

/// Every order, newest first, with customer emails.
///
/// GET /api/admin/orders
#[tracing::instrument(skip_all, fields(admin_id = %admin.id))]
async fn list(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Vec<AdminOrderView>>, AppError> {
    Ok(Json(service(&state)?.list_all().await?))
}

/// Create an order on behalf of a customer.
///
/// POST /api/admin/orders
#[tracing::instrument(skip_all, fields(admin_id = %admin.id))]
async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AdminOrderView>), AppError> {
    let request = json_body(payload)?
        .validate()
        .map_err(AppError::Validation)?;

    let view = service(&state)?.create(request).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Edit an order's mutable fields.
///
/// PUT /api/admin/orders/{id}
#[tracing::instrument(skip_all, fields(admin_id = %admin.id, order_id = %id))]
async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    payload: Result<Json<OrderPatch>, JsonRejection>,
) -> Result<Json<AdminOrderView>, AppError> {
    let patch = json_body(payload)?;
    Ok(Json(service(&state)?.update(&id, patch).await?))
}
