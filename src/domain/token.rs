use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// A signed bearer token and the instant it stops being accepted.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    // ---
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Mints bearer tokens for authenticated subjects.
///
/// The token is opaque to callers; the issuer enforces its own expiry.
#[async_trait::async_trait]
pub trait TokenIssuer: Send + Sync {
    // ---
    async fn mint(&self, subject: &str) -> anyhow::Result<IssuedToken>;
}

/// Type alias for any implementation of TokenIssuer.
pub type TokenIssuerPtr = Arc<dyn TokenIssuer>;
