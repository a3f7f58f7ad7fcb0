//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. The `AppState` holds the two
//! login flows, the stores behind them (for health checks), and the metrics
//! implementation.
//!
//! The state is cheaply cloneable (everything heavy sits behind an `Arc`) so
//! it can be handed to each request handler without copying resources.

use crate::domain::{
    MetricsPtr, OtpGenerator, OtpStorePtr, PasswordHasherPtr, TokenIssuerPtr, UserStorePtr,
};
use crate::usecase::{OtpAuthFlow, PasswordAuthFlow};
use std::sync::Arc;

/// Shared application state passed to all Axum handlers.
///
/// This struct serves as the Dependency Injection container for the application.
///
/// # Design Principles
///
/// - **Dependency Inversion**: Handlers and flows depend on the store, hasher and
///   token traits, not on PostgreSQL, Redis or JWT directly.
/// - **Immutable After Initialization**: State is built once at startup and
///   never mutated.
/// - **Cheap Cloning**: All fields are `Arc`s.
///
/// # Lifecycle
///
/// 1. Created once in `create_router()` during application startup (or by a test)
/// 2. Attached to the Axum router via `.with_state(app_state)`
/// 3. Cloned automatically by Axum for each incoming HTTP request
/// 4. Handlers extract via `State(state): State<AppState>`
#[derive(Clone)]
pub struct AppState {
    /// Phone OTP request/redeem orchestration.
    otp_flow: Arc<OtpAuthFlow>,

    /// Username/password sign-up and login.
    password_flow: Arc<PasswordAuthFlow>,

    /// OTP persistence, kept here for the full health check.
    otp_store: OtpStorePtr,

    /// User persistence, kept here for the full health check.
    user_store: UserStorePtr,

    /// Either Prometheus-backed (production) or no-op (testing/development).
    metrics: MetricsPtr,
}

impl AppState {
    // ---

    /// Wire the login flows from their collaborators.
    pub fn new(
        otp_store: OtpStorePtr,
        user_store: UserStorePtr,
        generator: OtpGenerator,
        tokens: TokenIssuerPtr,
        hasher: PasswordHasherPtr,
        metrics: MetricsPtr,
    ) -> Self {
        // ---
        let otp_flow = OtpAuthFlow::new(otp_store.clone(), Arc::new(generator), tokens.clone());
        let password_flow = PasswordAuthFlow::new(user_store.clone(), hasher, tokens);

        AppState {
            otp_flow: Arc::new(otp_flow),
            password_flow: Arc::new(password_flow),
            otp_store,
            user_store,
            metrics,
        }
    }

    pub(crate) fn otp_flow(&self) -> &OtpAuthFlow {
        // ---
        &self.otp_flow
    }

    pub(crate) fn password_flow(&self) -> &PasswordAuthFlow {
        // ---
        &self.password_flow
    }

    pub(crate) fn otp_store(&self) -> &OtpStorePtr {
        // ---
        &self.otp_store
    }

    pub(crate) fn user_store(&self) -> &UserStorePtr {
        // ---
        &self.user_store
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Create the `admin`/`admin` and `user`/`user` accounts if missing.
    pub async fn seed_default_users(&self) -> anyhow::Result<()> {
        // ---
        for name in ["admin", "user"] {
            if self.password_flow.ensure_user(name, name).await? {
                tracing::info!("Seeded default account '{}'", name);
            }
        }
        Ok(())
    }
}
