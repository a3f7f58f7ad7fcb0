// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for the service.
//! Configuration is validated eagerly and failures are treated as
//! deployment errors rather than recoverable runtime conditions.

use anyhow::Result;
use std::time::Duration;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads a required environment variable.
///
/// # Behavior
/// - Fails fast if the variable is missing
/// - Produces a clear, human-readable error message
/// - Intended for startup-time configuration validation
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. This macro is appropriate for non-critical
/// tuning parameters where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

/// Reads an optional string environment variable with a default.
macro_rules! optional_env {
    // ---
    ($key:literal, $default:expr) => {
        std::env::var($key).unwrap_or_else(|_| $default.to_string())
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
/// All required configuration is validated eagerly during initialization.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: server::ServerConfig,
    pub storage: storage::StorageConfig,
    pub jwt: jwt::JwtConfig,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any required configuration is missing or invalid.
    /// This function is intended to be called exactly once at startup.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            server: server::ServerConfig::from_env()?,
            storage: storage::StorageConfig::from_env()?,
            jwt: jwt::JwtConfig::from_env()?,
        })
    }
}

// ============================================================
// Server configuration
// ============================================================

mod server {
    // ---
    use super::*;

    /// Which metrics backend to record into.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MetricsBackend {
        Noop,
        Prometheus,
    }

    /// Process-level settings: listen address, metrics, seed data.
    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        /// Socket address to bind. Defaults to `127.0.0.1:8080`.
        pub bind_addr: String,

        /// `prom` selects Prometheus, anything else is a no-op.
        pub metrics: MetricsBackend,

        /// Create the default `admin` and `user` accounts at startup. Defaults to true.
        pub seed_users: bool,
    }

    impl ServerConfig {
        pub fn from_env() -> Result<Self> {
            // ---
            let bind_addr = optional_env!("TODO_BIND_ADDR", "127.0.0.1:8080");
            let metrics = match optional_env!("TODO_METRICS_TYPE", "noop").as_str() {
                "prom" => MetricsBackend::Prometheus,
                _ => MetricsBackend::Noop,
            };
            let seed_users = optional_env_parse!("TODO_SEED_USERS", bool, true);

            Ok(Self {
                bind_addr,
                metrics,
                seed_users,
            })
        }
    }
}
pub use server::{MetricsBackend, ServerConfig};

// ============================================================
// Storage configuration
// ============================================================

mod storage {
    // ---
    use super::*;

    /// Backend holding OTP challenges.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum OtpStoreKind {
        Memory,
        Postgres,
        Redis,
    }

    /// Backend holding user credentials.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum UserStoreKind {
        Memory,
        Postgres,
    }

    /// Store selection plus the connection settings the selection needs.
    ///
    /// `database` is present whenever either store is PostgreSQL, `redis`
    /// whenever the OTP store is Redis.
    #[derive(Debug, Clone)]
    pub struct StorageConfig {
        pub otp_store: OtpStoreKind,
        pub user_store: UserStoreKind,
        pub database: Option<DatabaseConfig>,
        pub redis: Option<RedisConfig>,
    }

    impl StorageConfig {
        /// # Errors
        /// Fails on an unknown backend name, or when the chosen backend's
        /// connection URL is missing.
        pub fn from_env() -> Result<Self> {
            // ---
            let otp_store = match optional_env!("TODO_OTP_STORE", "memory").as_str() {
                "memory" => OtpStoreKind::Memory,
                "postgres" => OtpStoreKind::Postgres,
                "redis" => OtpStoreKind::Redis,
                other => anyhow::bail!("Invalid TODO_OTP_STORE value: {other}"),
            };
            let user_store = match optional_env!("TODO_USER_STORE", "memory").as_str() {
                "memory" => UserStoreKind::Memory,
                "postgres" => UserStoreKind::Postgres,
                other => anyhow::bail!("Invalid TODO_USER_STORE value: {other}"),
            };

            let needs_database =
                otp_store == OtpStoreKind::Postgres || user_store == UserStoreKind::Postgres;
            let database = if needs_database {
                Some(DatabaseConfig::from_env()?)
            } else {
                None
            };

            let redis = if otp_store == OtpStoreKind::Redis {
                Some(RedisConfig::from_env()?)
            } else {
                None
            };

            Ok(Self {
                otp_store,
                user_store,
                database,
                redis,
            })
        }
    }

    /// Database-related configuration derived from environment variables.
    #[derive(Debug, Clone)]
    pub struct DatabaseConfig {
        /// PostgreSQL connection string.
        pub database_url: String,

        /// Number of retry attempts when initializing the database connection. Defaults to 50.
        pub retry_count: u32,

        /// Maximum time to wait when acquiring a connection from the pool. Defaults to 30 seconds.
        pub acquire_timeout: Duration,

        /// Minimum number of connections to keep in the pool, even when idle. Defaults to 2.
        pub min_connections: u32,

        /// Maximum number of connections to be open concurrently. Defaults to 15
        pub max_connections: u32,
    }

    impl DatabaseConfig {
        /// Builds a [`DatabaseConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if required configuration is missing.
        pub fn from_env() -> Result<Self> {
            // ---
            let database_url = required_env!("DATABASE_URL");
            let retry_count = optional_env_parse!("TODO_DB_RETRY_COUNT", u32, 50);
            let acquire_timeout_secs = optional_env_parse!("TODO_DB_ACQUIRE_TIMEOUT_SEC", u64, 30);
            let min_connections = optional_env_parse!("TODO_DB_MIN_CONNECTIONS", u32, 2);
            let max_connections = optional_env_parse!("TODO_DB_MAX_CONNECTIONS", u32, 15);

            Ok(Self {
                database_url,
                retry_count,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
                min_connections,
                max_connections,
            })
        }
    }

    /// Redis connection settings for the OTP store.
    #[derive(Debug, Clone)]
    pub struct RedisConfig {
        /// Redis connection string.
        pub url: String,
    }

    impl RedisConfig {
        pub fn from_env() -> Result<Self> {
            // ---
            let url = required_env!("TODO_REDIS_URL");
            Ok(Self { url })
        }
    }
}
pub use storage::{DatabaseConfig, OtpStoreKind, RedisConfig, StorageConfig, UserStoreKind};

// ============================================================
// JWT configuration
// ============================================================

mod jwt {
    // ---
    use super::*;

    /// Upper bound on token lifetime: one day.
    pub const MAX_JWT_TTL_SECS: u64 = 24 * 60 * 60;

    /// Bearer token signing settings.
    ///
    /// The key is security-critical and has no default.
    #[derive(Clone)]
    pub struct JwtConfig {
        /// HMAC secret for HS256 signing.
        pub key: String,

        /// `iss` claim. Defaults to `todo-api`.
        pub issuer: String,

        /// `aud` claim. Defaults to `todo-api`.
        pub audience: String,

        /// Token lifetime. Defaults to 60 seconds.
        pub ttl: Duration,
    }

    impl std::fmt::Debug for JwtConfig {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("JwtConfig")
                .field("key", &"<redacted>")
                .field("issuer", &self.issuer)
                .field("audience", &self.audience)
                .field("ttl", &self.ttl)
                .finish()
        }
    }

    impl JwtConfig {
        pub fn from_env() -> Result<Self> {
            // ---
            let key = required_env!("TODO_JWT_KEY");
            if key.is_empty() {
                anyhow::bail!("TODO_JWT_KEY must not be empty");
            }
            let issuer = optional_env!("TODO_JWT_ISSUER", "todo-api");
            let audience = optional_env!("TODO_JWT_AUDIENCE", "todo-api");
            let ttl_secs = optional_env_parse!("TODO_JWT_TTL_SEC", u64, 60);
            if ttl_secs == 0 || ttl_secs > MAX_JWT_TTL_SECS {
                anyhow::bail!(
                    "TODO_JWT_TTL_SEC must be between 1 and {MAX_JWT_TTL_SECS}, got {ttl_secs}"
                );
            }

            Ok(Self {
                key,
                issuer,
                audience,
                ttl: Duration::from_secs(ttl_secs),
            })
        }
    }
}
pub use jwt::{JwtConfig, MAX_JWT_TTL_SECS};

// ============================================================
// Tests
// ============================================================
