//! Vocabularies for the admin order form.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use jewelry_orders_core::{JEWELRY_TYPES, MATERIALS, OrderStatus};

use crate::middleware::RequireAdmin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/admin/options", get(options))
}

#[derive(Debug, Serialize)]
pub struct StatusOption {
    pub value: String,
    pub label: String,
}

/// Suggested values; none of them are enforced on write.
#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub statuses: Vec<StatusOption>,
    pub jewelry_types: &'static [&'static str],
    pub materials: &'static [&'static str],
}

impl FormOptions {
    fn current() -> Self {
        Self {
            statuses: OrderStatus::selectable()
                .map(|status| StatusOption {
                    value: status.as_str().to_owned(),
                    label: status.label().to_owned(),
                })
                .collect(),
            jewelry_types: &JEWELRY_TYPES,
            materials: &MATERIALS,
        }
    }
}

/// GET /api/admin/options
async fn options(_admin: RequireAdmin) -> Json<FormOptions> {
    Json(FormOptions::current())
}
