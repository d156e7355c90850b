//! JSON shapes for order endpoints.

use serde::{Deserialize, Serialize};

use jewelry_orders_core::{Email, NewOrder, Order, OrderStatus, OrderSummary, UserId, blank_to_none};

/// An order as shown to its owner.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub status_label: String,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        let status_label = order.status.label().to_owned();
        Self {
            order,
            status_label,
        }
    }
}

/// An order as shown in the admin panel, with its owner's email.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOrderView {
    #[serde(flatten)]
    pub view: OrderView,
    /// `None` when the owner could not be looked up.
    pub customer_email: Option<String>,
}

impl AdminOrderView {
    #[must_use]
    pub fn new(order: Order, customer_email: Option<String>) -> Self {
        Self {
            view: order.into(),
            customer_email,
        }
    }
}

/// Response body for `GET /api/orders`.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerOrders {
    pub orders: Vec<OrderView>,
    pub summary: OrderSummary,
}

impl From<Vec<Order>> for CustomerOrders {
    fn from(orders: Vec<Order>) -> Self {
        let summary = OrderSummary::from_orders(&orders);
        Self {
            orders: orders.into_iter().map(OrderView::from).collect(),
            summary,
        }
    }
}

/// Request body for `POST /api/admin/orders`.
///
/// Every field is optional at the wire level so missing values surface as a
/// validation error naming them rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub jewelry_type: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub carat: Option<String>,
}

/// A create request whose required fields are present.
#[derive(Debug, Clone)]
pub struct ValidCreateOrder {
    pub customer_email: Email,
    pub title: String,
    pub status: OrderStatus,
    pub description: Option<String>,
    pub jewelry_type: Option<String>,
    pub material: Option<String>,
    pub carat: Option<String>,
}

impl CreateOrderRequest {
    /// Check required fields and normalize optional ones.
    ///
    /// # Errors
    ///
    /// Returns a client-facing message naming the missing fields, or
    /// describing why the customer email is unusable.
    pub fn validate(self) -> Result<ValidCreateOrder, String> {
        let customer_email = blank_to_none(self.customer_email);
        let title = blank_to_none(self.title);
        let status = blank_to_none(self.status);

        let missing: Vec<&str> = [
            ("customer_email", customer_email.is_none()),
            ("title", title.is_none()),
            ("status", status.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect();

        let (Some(customer_email), Some(title), Some(status)) = (customer_email, title, status)
        else {
            return Err(format!("Missing required fields: {}", missing.join(", ")));
        };

        let customer_email =
            Email::parse(&customer_email).map_err(|e| format!("Invalid customer_email: {e}"))?;

        Ok(ValidCreateOrder {
            customer_email,
            title: title.trim().to_owned(),
            status: OrderStatus::from(status.trim().to_owned()),
            description: blank_to_none(self.description),
            jewelry_type: blank_to_none(self.jewelry_type),
            material: blank_to_none(self.material),
            carat: blank_to_none(self.carat),
        })
    }
}

impl ValidCreateOrder {
    /// Row values for an order owned by `user_id`.
    #[must_use]
    pub fn into_new_order(self, user_id: UserId) -> NewOrder {
        NewOrder {
            user_id,
            title: self.title,
            description: self.description,
            status: self.status,
            jewelry_type: self.jewelry_type,
            material: self.material,
            carat: self.carat,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jewelry_orders_core::OrderId;
    use uuid::Uuid;

    fn request(json: &str) -> CreateOrderRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_validate_names_missing_fields() {
        let err = request(r#"{"title": "Ring"}"#).validate().unwrap_err();
        assert_eq!(err, "Missing required fields: customer_email, status");

        let err = request(r#"{"customer_email": " ", "title": "", "status": "design"}"#)
            .validate()
            .unwrap_err();
        assert_eq!(err, "Missing required fields: customer_email, title");
    }

    #[test]
    fn test_validate_rejects_malformed_email() {
        let err = request(r#"{"customer_email": "nobody", "title": "Ring", "status": "design"}"#)
            .validate()
            .unwrap_err();
        assert!(err.starts_with("Invalid customer_email"));
    }

    #[test]
    fn test_validate_blanks_optional_fields() {
        let valid = request(
            r#"{"customer_email": "Ann@Example.com", "title": "Ring", "status": "design",
                "description": "", "carat": "0.5"}"#,
        )
        .validate()
        .unwrap();

        assert_eq!(valid.customer_email.as_str(), "Ann@Example.com");
        assert_eq!(valid.status, OrderStatus::Design);
        assert_eq!(valid.description, None);
        assert_eq!(valid.carat.as_deref(), Some("0.5"));
    }

    #[test]
    fn test_admin_view_serializes_flat() {
        let order = Order {
            id: OrderId::new(Uuid::nil()),
            user_id: UserId::new(Uuid::nil()),
            title: "Ring".to_string(),
            description: None,
            status: OrderStatus::QualityCheck,
            jewelry_type: None,
            material: None,
            carat: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(AdminOrderView::new(order, None)).unwrap();
        assert_eq!(json["status"], "quality_check");
        assert_eq!(json["status_label"], "Quality check");
        assert!(json["customer_email"].is_null());
        assert_eq!(json["title"], "Ring");
    }
}
