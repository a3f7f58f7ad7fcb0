//! HS256 JWT bearer tokens.

use crate::config::JwtConfig;
use crate::domain::{IssuedToken, TokenIssuer};
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Claims carried by every token this service signs.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn create_jwt_issuer(config: &JwtConfig) -> Result<Arc<JwtTokenIssuer>> {
    // ---
    Ok(Arc::new(JwtTokenIssuer::new(config)?))
}

/// Signs and checks HS256 tokens with a shared secret.
pub struct JwtTokenIssuer {
    // ---
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl JwtTokenIssuer {
    // ---
    /// # Errors
    /// Fails if the configured lifetime does not fit a `chrono::Duration`.
    pub fn new(config: &JwtConfig) -> Result<Self> {
        // ---
        let ttl = i64::try_from(config.ttl.as_secs())
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| anyhow!("JWT lifetime of {}s is out of range", config.ttl.as_secs()))?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.key.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl,
        })
    }

    /// Sign a token for `subject`, valid for the configured lifetime.
    pub fn sign(&self, subject: &str) -> Result<IssuedToken> {
        // ---
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| anyhow!("token expiry overflows the calendar"))?;

        let claims = TokenClaims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature, issuer, audience and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims> {
        // ---
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.leeway = 0;

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

#[async_trait::async_trait]
impl TokenIssuer for JwtTokenIssuer {
    // ---
    async fn mint(&self, subject: &str) -> Result<IssuedToken> {
        // ---
        self.sign(subject)
    }
}
