//! Sample order seeding.

use jewelry_orders_core::{NewOrder, UserId};
use jewelry_orders_server::db::{OrderStore, PgOrderStore};

use super::{CommandError, connect};

/// Insert the sample orders for `user_id`.
///
/// Skips users who already have orders unless `force` is set.
///
/// # Errors
///
/// Returns `CommandError` if the connection or insert fails.
pub async fn run(user_id: UserId, force: bool) -> Result<(), CommandError> {
    let store = PgOrderStore::new(connect().await?);

    let existing = store.list_for_user(user_id).await?;
    if !existing.is_empty() && !force {
        tracing::info!(
            %user_id,
            count = existing.len(),
            "User already has orders; pass --force to seed anyway"
        );
        return Ok(());
    }

    let seeded = store.insert_many(&NewOrder::samples_for(user_id)).await?;
    tracing::info!(%user_id, count = seeded.len(), "Seeded sample orders");
    Ok(())
}
