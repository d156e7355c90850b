//! Order store migrations.
//!
//! Migrations live in `crates/server/migrations/` and are embedded at build
//! time. The session table is created by the server itself on startup.

use super::{CommandError, connect};

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if `DATABASE_URL` is unset, the connection fails,
/// or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running order store migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
