//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Server
//! - `APP_HOST` - Bind address (default: 127.0.0.1)
//! - `APP_PORT` - Listen port (default: 3000)
//! - `APP_BASE_URL` - Public URL (default: <http://localhost:3000>); `https://` enables secure cookies
//!
//! ## Authorization
//! - `NEXT_PUBLIC_ADMIN_EMAILS` - Comma-separated admin allow-list; takes
//!   precedence over `ADMIN_EMAILS` when set
//! - `ADMIN_EMAILS` - Comma-separated admin allow-list (default: empty, nobody is admin)
//!
//! ## Order store
//! - `DATABASE_URL` - `PostgreSQL` connection string. When absent, every
//!   request that touches orders fails with "Server configuration error".
//!
//! ## Identity provider (all three or none)
//! - `SUPABASE_URL` - Project URL, e.g. `https://abc.supabase.co`
//! - `SUPABASE_ANON_KEY` - Public key used for user-scoped calls
//! - `SUPABASE_SERVICE_ROLE_KEY` - HIGH PRIVILEGE key for user administration
//!
//! ## Observability
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use jewelry_orders_core::AdminDirectory;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Variables holding the admin allow-list, in precedence order.
pub const ADMIN_EMAIL_VARS: [&str; 2] = ["NEXT_PUBLIC_ADMIN_EMAILS", "ADMIN_EMAILS"];

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "todo",
    "fixme",
    "insert",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the service
    pub base_url: String,
    /// Admin allow-list, fixed for the process lifetime
    pub admins: AdminDirectory,
    /// Order store connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// Identity provider settings
    pub identity: Option<IdentityConfig>,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Identity provider configuration.
///
/// Implements `Debug` manually to redact both keys.
#[derive(Clone)]
pub struct IdentityConfig {
    /// Project base URL; the auth API lives under `/auth/v1`
    pub url: Url,
    /// Public (anon) key sent with user-scoped requests
    pub anon_key: SecretString,
    /// Service-role key for user administration (HIGH PRIVILEGE)
    pub service_role_key: SecretString,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"[REDACTED]")
            .field("service_role_key", &"[REDACTED]")
            .finish()
    }
}

impl IdentityConfig {
    fn from_lookup(env: &Lookup<'_>) -> Result<Option<Self>, ConfigError> {
        let url = env.optional("SUPABASE_URL");
        let anon_key = env.optional("SUPABASE_ANON_KEY");
        let service_role_key = env.optional("SUPABASE_SERVICE_ROLE_KEY");

        match (url, anon_key, service_role_key) {
            (Some(url), Some(anon_key), Some(service_role_key)) => {
                let url = Url::parse(&url).map_err(|e| {
                    ConfigError::InvalidEnvVar("SUPABASE_URL".to_string(), e.to_string())
                })?;

                if let Err(e) = validate_secret_strength(&service_role_key, "SUPABASE_SERVICE_ROLE_KEY")
                {
                    tracing::warn!("SUPABASE_SERVICE_ROLE_KEY validation warning: {e}");
                }

                Ok(Some(Self {
                    url,
                    anon_key: SecretString::from(anon_key),
                    service_role_key: SecretString::from(service_role_key),
                }))
            }
            (None, None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "SUPABASE_*".to_string(),
                "SUPABASE_URL, SUPABASE_ANON_KEY and SUPABASE_SERVICE_ROLE_KEY must be set together"
                    .to_string(),
            )),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if the
    /// identity provider is only partially configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Lookup(lookup);

        let host = env
            .or_default("APP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("APP_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("APP_PORT".to_string(), e.to_string()))?;
        let base_url = env.or_default("APP_BASE_URL", "http://localhost:3000");

        let admins = admins_from_lookup(lookup);
        let database_url = env.optional("DATABASE_URL").map(SecretString::from);
        let identity = IdentityConfig::from_lookup(&env)?;

        let json_logs = env
            .optional("LOG_FORMAT")
            .is_some_and(|f| f.eq_ignore_ascii_case("json"));
        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = env
            .optional("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            host,
            port,
            base_url,
            admins,
            database_url,
            identity,
            json_logs,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// The admin allow-list from the first non-blank of [`ADMIN_EMAIL_VARS`].
#[must_use]
pub fn admins_from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> AdminDirectory {
    let env = Lookup(lookup);
    let raw = ADMIN_EMAIL_VARS
        .iter()
        .find_map(|key| env.optional(key))
        .unwrap_or_default();
    AdminDirectory::from_csv(&raw)
}

/// Variable source; blank values count as unset.
struct Lookup<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Lookup<'_> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

impl IdentityConfig {
    /// Base URL of the auth API (`{url}/auth/v1`).
    #[must_use]
    pub fn auth_base(&self) -> String {
        format!("{}/auth/v1", self.url.as_str().trim_end_matches('/'))
    }

    /// Service-role key, exposed for request headers only.
    pub(crate) fn service_key(&self) -> &str {
        self.service_role_key.expose_secret()
    }

    /// Anon key, exposed for request headers only.
    pub(crate) fn anon(&self) -> &str {
        self.anon_key.expose_secret()
    }
}
