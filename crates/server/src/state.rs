//! Application state shared across handlers.

use std::sync::Arc;

use jewelry_orders_core::AdminDirectory;

use crate::config::AppConfig;
use crate::db::OrderStore;
use crate::error::AppError;
use crate::identity::IdentityProvider;

/// Application state shared across all handlers.
///
/// Cheap to clone (one `Arc`). Everything inside is immutable for the life
/// of the process; the store and identity provider are optional so the
/// service can start with either unconfigured and fail per request instead.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    orders: Option<Arc<dyn OrderStore>>,
    identity: Option<Arc<dyn IdentityProvider>>,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: AppConfig,
        orders: Option<Arc<dyn OrderStore>>,
        identity: Option<Arc<dyn IdentityProvider>>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                orders,
                identity,
            }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// The admin allow-list loaded at startup.
    #[must_use]
    pub fn admins(&self) -> &AdminDirectory {
        &self.inner.config.admins
    }

    /// The order store, or a configuration error when none is set up.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if `DATABASE_URL` was not provided.
    pub fn orders(&self) -> Result<&dyn OrderStore, AppError> {
        self.inner
            .orders
            .as_deref()
            .ok_or_else(|| AppError::Configuration("DATABASE_URL".to_string()))
    }

    /// The identity provider, or a configuration error when none is set up.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` if the `SUPABASE_*` variables were
    /// not provided.
    pub fn identity(&self) -> Result<&dyn IdentityProvider, AppError> {
        self.inner
            .identity
            .as_deref()
            .ok_or_else(|| AppError::Configuration("SUPABASE_URL".to_string()))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("orders", &self.inner.orders.is_some())
            .field("identity", &self.inner.identity.is_some())
            .finish()
    }
}
