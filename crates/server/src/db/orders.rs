//! Order repository.
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate compiles
//! without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use jewelry_orders_core::{NewOrder, Order, OrderId, OrderPatch, OrderStatus, UserId};

use super::RepositoryError;

const ORDER_COLUMNS: &str =
    "id, user_id, title, description, status, jewelry_type, material, carat, created_at";

/// Persistence seam for orders.
///
/// Handlers only see this trait so the HTTP layer can be exercised against an
/// in-memory store.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Orders owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError>;

    /// Every order, newest first.
    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Insert one order and return the stored row.
    async fn insert(&self, order: &NewOrder) -> Result<Order, RepositoryError>;

    /// Insert several orders in a single statement and return the stored rows.
    async fn insert_many(&self, orders: &[NewOrder]) -> Result<Vec<Order>, RepositoryError>;

    /// Apply `patch` to the order with `id`.
    ///
    /// Returns `Ok(None)` when no such order exists. An empty patch is a
    /// caller bug and is rejected before it reaches the store.
    async fn update(&self, id: OrderId, patch: &OrderPatch)
    -> Result<Option<Order>, RepositoryError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    status: String,
    jewelry_type: Option<String>,
    material: Option<String>,
    carat: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            title: row.title,
            description: row.description,
            status: OrderStatus::from(row.status),
            jewelry_type: row.jewelry_type,
            material: row.material,
            carat: row.carat,
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// `PostgreSQL`-backed [`OrderStore`].
#[derive(Debug, Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn insert(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO orders (user_id, title, description, status, jewelry_type, material, carat)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(order.user_id.as_uuid())
        .bind(&order.title)
        .bind(&order.description)
        .bind(order.status.as_str())
        .bind(&order.jewelry_type)
        .bind(&order.material)
        .bind(&order.carat)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn insert_many(&self, orders: &[NewOrder]) -> Result<Vec<Order>, RepositoryError> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "INSERT INTO orders (user_id, title, description, status, jewelry_type, material, carat) ",
        );
        builder.push_values(orders, |mut b, order| {
            b.push_bind(order.user_id.as_uuid())
                .push_bind(order.title.clone())
                .push_bind(order.description.clone())
                .push_bind(order.status.as_str().to_owned())
                .push_bind(order.jewelry_type.clone())
                .push_bind(order.material.clone())
                .push_bind(order.carat.clone());
        });
        builder.push(" RETURNING ");
        builder.push(ORDER_COLUMNS);

        let rows = builder
            .build_query_as::<OrderRow>()
            .fetch_all(&self.pool)
            .await?;

        if rows.len() != orders.len() {
            return Err(RepositoryError::DataCorruption(format!(
                "inserted {} orders but {} rows came back",
                orders.len(),
                rows.len()
            )));
        }

        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn update(
        &self,
        id: OrderId,
        patch: &OrderPatch,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE orders SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(status) = &patch.status {
                set.push("status = ")
                    .push_bind_unseparated(status.as_str().to_owned());
            }
            if let Some(title) = &patch.title {
                set.push("title = ").push_bind_unseparated(title.clone());
            }
            if let Some(description) = &patch.description {
                set.push("description = ")
                    .push_bind_unseparated(description.clone());
            }
            if let Some(jewelry_type) = &patch.jewelry_type {
                set.push("jewelry_type = ")
                    .push_bind_unseparated(jewelry_type.clone());
            }
            if let Some(material) = &patch.material {
                set.push("material = ")
                    .push_bind_unseparated(material.clone());
            }
            if let Some(carat) = &patch.carat {
                set.push("carat = ").push_bind_unseparated(carat.clone());
            }
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id.as_uuid());
        builder.push(" RETURNING ");
        builder.push(ORDER_COLUMNS);

        let row = builder
            .build_query_as::<OrderRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Order::from))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
