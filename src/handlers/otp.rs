//! Phone OTP login handlers.
//!
//! 1. `request_otp` - Issue, reissue or reuse the code for a phone number
//! 2. `login_by_phone` - Redeem a (phone, code) pair for a bearer token

use crate::app_state::AppState;
use crate::domain::{IssuedToken, OtpIssue};
use crate::error::AuthError;
use crate::handlers::shared_types::ApiResponse;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OtpRequestQuery {
    // ---
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct OtpResponse {
    // ---
    pub code: String,
    /// `issued`, `reissued` or `reused`.
    pub status: &'static str,
    pub message: String,
}

impl From<OtpIssue> for OtpResponse {
    fn from(issue: OtpIssue) -> Self {
        // ---
        let message = match &issue {
            OtpIssue::Issued { code } => format!("OTP: {code}"),
            OtpIssue::Reissued { code } => format!("New OTP: {code}"),
            OtpIssue::Reused { code } => {
                format!("Use previously generated OTP [{code}] as it hasn't expired.")
            }
        };

        OtpResponse {
            status: issue.label(),
            code: issue.code().to_string(),
            message,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PhoneLoginRequest {
    // ---
    pub phone_number: String,
    pub otp_code: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    // ---
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        TokenResponse {
            token: issued.token,
            expires_at: issued.expires_at,
        }
    }
}

fn redemption_outcome(err: &AuthError) -> &'static str {
    // ---
    match err {
        AuthError::InvalidPhone => "rejected",
        AuthError::InvalidOtp => "invalid",
        AuthError::ExpiredOtp => "expired",
        _ => "failed",
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/login/otp?phone=5551234567
///
/// # Responses
/// - `200 OK` with `{ "data": { "code", "status", "message" } }`
/// - `400 Bad Request` if the phone number is not ten plain digits
/// - `500 Internal Server Error` on storage failure
#[tracing::instrument(skip(state, query))]
pub async fn request_otp(
    State(state): State<AppState>,
    Query(query): Query<OtpRequestQuery>,
) -> Result<ApiResponse<OtpResponse>, AuthError> {
    // ---
    match state.otp_flow().request_code(&query.phone).await {
        Ok(issue) => {
            state.metrics().record_otp_request(issue.label());
            Ok(ApiResponse {
                data: issue.into(),
            })
        }
        Err(err) => {
            let outcome = match err {
                AuthError::InvalidPhone => "rejected",
                _ => "failed",
            };
            state.metrics().record_otp_request(outcome);
            Err(err)
        }
    }
}

/// POST /api/login/phone
///
/// # Request Body
/// ```json
/// { "phone_number": "5551234567", "otp_code": "K3Q9ZA" }
/// ```
///
/// # Responses
/// - `200 OK` with `{ "data": { "token", "expires_at" } }`
/// - `400 Bad Request` if the phone number is malformed
/// - `401 Unauthorized` with kind `INVALID_OTP` or `EXPIRED_OTP`
#[tracing::instrument(skip(state, req))]
pub async fn login_by_phone(
    State(state): State<AppState>,
    Json(req): Json<PhoneLoginRequest>,
) -> Result<ApiResponse<TokenResponse>, AuthError> {
    // ---
    let result = state
        .otp_flow()
        .redeem_code(&req.phone_number, &req.otp_code)
        .await;

    match result {
        Ok(token) => {
            state.metrics().record_otp_redemption("success");
            Ok(ApiResponse { data: token.into() })
        }
        Err(err) => {
            state.metrics().record_otp_redemption(redemption_outcome(&err));
            Err(err)
        }
    }
}
