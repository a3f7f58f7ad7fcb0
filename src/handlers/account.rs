//! Username/password account handlers.

use crate::app_state::AppState;
use crate::error::AuthError;
use crate::handlers::otp::TokenResponse;
use crate::handlers::shared_types::ApiResponse;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    // ---
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    // ---
    pub id: Uuid,
    pub username: String,
    pub message: String,
}

/// POST /api/signup
///
/// - `201 Created` with the new account's id and username
/// - `400 Bad Request` if a field is missing or the username is taken
#[tracing::instrument(skip(state, req))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, ApiResponse<SignUpResponse>), AuthError> {
    // ---
    let user = state
        .password_flow()
        .sign_up(&req.username, &req.password)
        .await?;

    let message = format!("Hello {}, your signup was successful!", user.username);
    Ok((
        StatusCode::CREATED,
        ApiResponse {
            data: SignUpResponse {
                id: user.id,
                username: user.username,
                message,
            },
        },
    ))
}

/// POST /api/login
///
/// - `200 OK` with `{ "data": { "token", "expires_at" } }`
/// - `401 Unauthorized` for an unknown user or wrong password
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<ApiResponse<TokenResponse>, AuthError> {
    // ---
    match state
        .password_flow()
        .login(&req.username, &req.password)
        .await
    {
        Ok(token) => {
            state.metrics().record_password_login("success");
            Ok(ApiResponse { data: token.into() })
        }
        Err(err) => {
            let outcome = match err {
                AuthError::InvalidLogin => "invalid",
                _ => "failed",
            };
            state.metrics().record_password_login(outcome);
            Err(err)
        }
    }
}
