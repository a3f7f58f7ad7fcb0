// src/lib.rs
use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use handlers::{
    health_check, login, login_by_phone, metrics_handler, request_otp, root_handler, sign_up,
    track_metrics,
};

// Public exports (visible outside this module)
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod error;
mod handlers;
mod infrastructure;
mod usecase;

// Hoist up only the public symbol(s)
pub use app_state::AppState;
pub use error::AuthError;
pub use usecase::{OtpAuthFlow, PasswordAuthFlow, PhoneLocks};

pub use config::*;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    connect_with_retry, // ---
    create_jwt_issuer,
    create_noop_metrics,
    create_postgres_otp_store,
    create_postgres_user_store,
    create_prom_metrics,
    create_redis_otp_store,
    JwtTokenIssuer,
    MemoryOtpStore,
    MemoryUserStore,
    PostgresOtpStore,
    PostgresUserStore,
    RedisOtpStore,
    Sha256PasswordHasher,
    TokenClaims,
};

use domain::{MetricsPtr, OtpGenerator, OtpStorePtr, SystemClock, UserStorePtr};

/// Install the global `tracing` subscriber, filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    // ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).try_init().ok();
}

/// Attach every route to an already-wired state.
pub fn build_router(app_state: AppState) -> Router {
    // ---
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .nest(
            "/api",
            Router::new()
                .route("/login/otp", get(request_otp))
                .route("/login/phone", post(login_by_phone))
                .route("/login", post(login))
                .route("/signup", post(sign_up)),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            track_metrics,
        ))
        .with_state(app_state)
}

/// Build the HTTP router with every backend selected by `config`.
///
/// Connects to PostgreSQL (running migrations) or Redis only when a store
/// is configured to use them, and seeds the default accounts if enabled.
pub async fn create_app(config: &AppConfig) -> Result<Router> {
    // ---
    init_tracing();

    let metrics: MetricsPtr = match config.server.metrics {
        MetricsBackend::Prometheus => create_prom_metrics()?,
        MetricsBackend::Noop => create_noop_metrics()?,
    };

    let pool = match &config.storage.database {
        Some(db) => Some(connect_with_retry(db).await?),
        None => None,
    };

    let otp_store: OtpStorePtr = match (config.storage.otp_store, &pool, &config.storage.redis) {
        (OtpStoreKind::Memory, _, _) => Arc::new(MemoryOtpStore::new()),
        (OtpStoreKind::Postgres, Some(pool), _) => create_postgres_otp_store(pool.clone()),
        (OtpStoreKind::Redis, _, Some(redis)) => create_redis_otp_store(&redis.url)?,
        (kind, _, _) => anyhow::bail!("OTP store {kind:?} is missing its connection settings"),
    };

    let user_store: UserStorePtr = match (config.storage.user_store, &pool) {
        (UserStoreKind::Memory, _) => Arc::new(MemoryUserStore::new()),
        (UserStoreKind::Postgres, Some(pool)) => create_postgres_user_store(pool.clone()),
        (kind, None) => anyhow::bail!("user store {kind:?} is missing its connection settings"),
    };

    tracing::info!(
        otp_store = ?config.storage.otp_store,
        user_store = ?config.storage.user_store,
        "storage backends selected"
    );

    let app_state = AppState::new(
        otp_store,
        user_store,
        OtpGenerator::from_entropy(Arc::new(SystemClock)),
        create_jwt_issuer(&config.jwt)?,
        Arc::new(Sha256PasswordHasher),
        metrics,
    );

    if config.server.seed_users {
        app_state.seed_default_users().await?;
    }

    Ok(build_router(app_state))
}

/// Load [`AppConfig`] from the environment and build the router from it.
pub async fn create_router() -> Result<Router> {
    // ---
    let config = AppConfig::from_env()?;
    create_app(&config).await
}
