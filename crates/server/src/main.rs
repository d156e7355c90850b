//! Jewelry order service binary.
//!
//! # Architecture
//!
//! - Axum web framework, JSON only
//! - `PostgreSQL` for orders and sessions (optional; see `DATABASE_URL`)
//! - GoTrue-compatible identity provider for accounts and tokens
//!
//! Migrations are NOT run on startup. Apply them with:
//! ```bash
//! cargo run -p jewelry-orders-cli -- migrate
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tower_sessions::MemoryStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jewelry_orders_server::app;
use jewelry_orders_server::config::AppConfig;
use jewelry_orders_server::db::{self, OrderStore, PgOrderStore};
use jewelry_orders_server::identity::{GoTrueClient, IdentityProvider};
use jewelry_orders_server::middleware::{create_session_layer, postgres_store};
use jewelry_orders_server::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            // Customer emails are PII
            send_default_pii: false,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(config: &AppConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jewelry_orders_server=info,tower_http=debug".into());

    let json_layer = config
        .json_logs
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!config.json_logs).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(&config);

    if config.admins.is_empty() {
        tracing::warn!("ADMIN_EMAILS is empty; every admin request will be refused");
    } else {
        tracing::info!(count = config.admins.len(), "Admin allow-list loaded");
    }

    let pool = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");
            Some(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; order requests will fail");
            None
        }
    };

    let identity: Option<Arc<dyn IdentityProvider>> = match &config.identity {
        Some(identity_config) => {
            let client =
                GoTrueClient::new(identity_config).expect("Failed to build identity client");
            Some(Arc::new(client) as Arc<dyn IdentityProvider>)
        }
        None => {
            tracing::warn!("SUPABASE_* not set; authenticated requests will fail");
            None
        }
    };

    let orders = pool
        .clone()
        .map(|pool| Arc::new(PgOrderStore::new(pool)) as Arc<dyn OrderStore>);
    let state = AppState::new(config.clone(), orders, identity);

    let router = if let Some(pool) = &pool {
        let store = postgres_store(pool)
            .await
            .expect("Failed to prepare session store");
        app(state, create_session_layer(store, &config))
    } else {
        app(state, create_session_layer(MemoryStore::default(), &config))
    };

    let addr = config.socket_addr();
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
