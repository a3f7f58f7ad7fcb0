//! Service-level error taxonomy and its HTTP mapping.

use crate::domain::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Everything an authentication request can fail with.
///
/// "Wrong code" and "unknown phone" share `InvalidOtp` so callers cannot
/// probe which numbers have outstanding challenges.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    // ---
    #[error("phone number must be 10 digits with no special characters")]
    InvalidPhone,

    #[error("please provide username and password")]
    MissingCredentials,

    #[error("username {0} already exists")]
    UsernameTaken(String),

    #[error("invalid OTP")]
    InvalidOtp,

    #[error("OTP expired")]
    ExpiredOtp,

    #[error("invalid login")]
    InvalidLogin,

    #[error("storage failure")]
    Store(#[from] StoreError),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    // ---
    pub fn kind(&self) -> &'static str {
        // ---
        match self {
            Self::InvalidPhone => "INVALID_PHONE",
            Self::MissingCredentials => "MISSING_CREDENTIALS",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::InvalidOtp => "INVALID_OTP",
            Self::ExpiredOtp => "EXPIRED_OTP",
            Self::InvalidLogin => "INVALID_LOGIN",
            Self::Store(_) => "STORE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        // ---
        match self {
            Self::InvalidPhone | Self::MissingCredentials | Self::UsernameTaken(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidOtp | Self::ExpiredOtp | Self::InvalidLogin => StatusCode::UNAUTHORIZED,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // ---
        // 4xx are logged where they are raised; only 5xx carry a cause worth
        // recording here.
        match &self {
            Self::Store(e) => tracing::error!(error = %e, kind = self.kind(), "storage failure"),
            Self::Internal(e) => tracing::error!(error = %e, kind = self.kind(), "internal error"),
            _ => {}
        }

        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (self.status(), axum::Json(body)).into_response()
    }
}
