mod database;
mod memory;
pub mod metrics;
mod password;
mod redis_store;
mod token;

// Re-export the factory functions for easy access
pub use database::{
    connect_with_retry, create_postgres_otp_store, create_postgres_user_store, PostgresOtpStore,
    PostgresUserStore,
};
pub use memory::{MemoryOtpStore, MemoryUserStore};
pub use self::metrics::{create_noop_metrics, create_prom_metrics};
pub use password::Sha256PasswordHasher;
pub use redis_store::{create_redis_otp_store, RedisOtpStore};
pub use token::{create_jwt_issuer, JwtTokenIssuer, TokenClaims};
