use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Welcome to the To-Do Auth API
Version: {version}

Available endpoints:
  - GET    /api/login/otp?phone={{number}} - Request a one-time code for a phone number
  - POST   /api/login/phone                - Exchange phone number and code for a token
  - POST   /api/signup                     - Create a username/password account
  - POST   /api/login                      - Exchange username and password for a token
  - GET    /health                         - Light health check
  - GET    /health?mode=full               - Full health check (includes stores)
  - GET    /metrics                        - Prometheus metrics

Phone numbers are exactly 10 digits. Codes are valid for one minute and
tokens are short-lived bearer JWTs.
"#
    )
}
