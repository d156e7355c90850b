//! Order flows for customers and admins.

use jewelry_orders_core::{NewOrder, Order, OrderId, OrderPatch, OrderStatus, UserId};

use crate::db::{OrderStore, RepositoryError};
use crate::error::AppError;
use crate::models::{AdminOrderView, ValidCreateOrder};
use crate::services::customers::CustomerDirectory;

/// Message for updates addressed to a missing order.
pub const ORDER_NOT_FOUND: &str = "Order not found";

/// A customer's own orders.
pub struct CustomerOrderService<'a> {
    store: &'a dyn OrderStore,
}

impl<'a> CustomerOrderService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn OrderStore) -> Self {
        Self { store }
    }

    /// The caller's orders, newest first, seeding samples on first visit.
    ///
    /// An empty listing triggers a single insert of three sample orders,
    /// whose rows are returned directly. Seeding is best effort: if it fails
    /// the caller sees an empty list and the next visit tries again.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the initial listing query fails.
    #[tracing::instrument(skip(self))]
    pub async fn list_or_seed(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = self.store.list_for_user(user_id).await?;
        if !orders.is_empty() {
            return Ok(orders);
        }

        match self.store.insert_many(&NewOrder::samples_for(user_id)).await {
            Ok(seeded) => {
                tracing::info!(count = seeded.len(), "Seeded sample orders");
                Ok(seeded)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Seeding sample orders failed");
                Ok(Vec::new())
            }
        }
    }
}

/// Admin view over every order.
pub struct AdminOrderService<'a> {
    store: &'a dyn OrderStore,
    customers: CustomerDirectory<'a>,
}

impl<'a> AdminOrderService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn OrderStore, customers: CustomerDirectory<'a>) -> Self {
        Self { store, customers }
    }

    /// Every order, newest first, with owner emails.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the listing fails. Email lookups never
    /// fail the request; a failed one leaves `customer_email` empty.
    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<AdminOrderView>, AppError> {
        let orders = self.store.list_all().await?;
        let emails = self
            .customers
            .emails_for(orders.iter().map(|o| o.user_id))
            .await;

        Ok(orders
            .into_iter()
            .map(|order| {
                let email = emails.get(&order.user_id).cloned().flatten();
                AdminOrderView::new(order, email)
            })
            .collect())
    }

    /// Create an order for the customer with the given email, provisioning
    /// their account if none exists.
    ///
    /// # Errors
    ///
    /// Returns `AppError::IdentityLookup`, `AppError::IdentityCreate`, or
    /// `AppError::Store` depending on which step failed.
    #[tracing::instrument(skip(self, request), fields(status = %request.status))]
    pub async fn create(&self, request: ValidCreateOrder) -> Result<AdminOrderView, AppError> {
        warn_unknown_status(&request.status);

        let requested_email = request.customer_email.normalized();
        let customer = self
            .customers
            .find_or_create(&request.customer_email)
            .await?;

        let order = self
            .store
            .insert(&request.into_new_order(customer.id))
            .await?;

        tracing::info!(order_id = %order.id, user_id = %customer.id, "Order created");
        Ok(AdminOrderView::new(
            order,
            customer.email.or(Some(requested_email)),
        ))
    }

    /// Apply an admin edit.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the patch is empty or blanks a
    /// required field, `AppError::NotFound` if `id` does not name an order,
    /// and `AppError::Store` if the update fails.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: OrderPatch) -> Result<AdminOrderView, AppError> {
        let patch = patch
            .normalize()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // A malformed id cannot match any row.
        let id: OrderId = id
            .parse()
            .map_err(|_| AppError::NotFound(ORDER_NOT_FOUND.to_string()))?;

        if let Some(status) = &patch.status {
            warn_unknown_status(status);
        }

        let order = self
            .store
            .update(id, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound(ORDER_NOT_FOUND.to_string()))?;

        tracing::info!(order_id = %order.id, fields = ?patch.present_fields(), "Order updated");

        let email = self.customers.email_for(order.user_id).await;
        Ok(AdminOrderView::new(order, email))
    }
}

fn warn_unknown_status(status: &OrderStatus) {
    if !status.is_known() {
        tracing::warn!(status = %status, "Order status outside the known vocabulary");
    }
}
