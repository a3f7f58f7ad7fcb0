// Test helpers are intentionally partially used
#![allow(dead_code)]

use reqwest::Client;
use std::sync::{Arc, Once};
use std::time::Duration;
use todo_auth_api::domain::{ManualClock, OtpGenerator};
use todo_auth_api::{
    build_router, create_noop_metrics, create_router, AppState, JwtConfig, JwtTokenIssuer,
    MemoryOtpStore, MemoryUserStore, Sha256PasswordHasher,
};
use tokio::net::TcpListener;
use tokio::time::sleep;

macro_rules! set_env_if_unset {
    // ---
    ($key:expr, $val:expr) => {
        if std::env::var($key).is_err() {
            std::env::set_var($key, $val);
        }
    };
}

static INIT: Once = Once::new();

pub const TEST_JWT_KEY: &str = "integration-test-secret";

// ============================================================================
// Test Setup
// ============================================================================

/// Initialize environment variables once: in-memory stores, no-op metrics.
pub async fn setup_test_env() {
    // ---
    INIT.call_once(|| {
        // ---
        set_env_if_unset!("TODO_JWT_KEY", TEST_JWT_KEY);
        set_env_if_unset!("TODO_OTP_STORE", "memory");
        set_env_if_unset!("TODO_USER_STORE", "memory");
        set_env_if_unset!("TODO_METRICS_TYPE", "noop");
    });
}

pub fn test_jwt_config() -> JwtConfig {
    // ---
    JwtConfig {
        key: TEST_JWT_KEY.to_string(),
        issuer: "todo-api".to_string(),
        audience: "todo-api".to_string(),
        ttl: Duration::from_secs(60),
    }
}

pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
}

/// A server whose OTP expiry follows a clock the test controls.
pub struct ClockedServer {
    pub server: TestServer,
    pub clock: Arc<ManualClock>,
    pub tokens: Arc<JwtTokenIssuer>,
}

impl TestServer {
    // ---
    /// Serve the router exactly as `create_router()` builds it from the environment.
    pub async fn new() -> Self {
        // --
        setup_test_env().await;

        // Enable debug logging only when requested
        if std::env::var("TEST_DEBUG").is_ok() {
            std::env::set_var("RUST_LOG", "debug");
            std::env::set_var("NO_COLOR", "1");
        }

        let app = create_router()
            .await
            .expect("Should be able to create router");
        Self::serve(app).await
    }

    /// Serve in-memory stores wired to a manual clock.
    pub async fn with_manual_clock() -> ClockedServer {
        // ---
        let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
        let tokens = Arc::new(JwtTokenIssuer::new(&test_jwt_config()).expect("valid JWT config"));

        let state = AppState::new(
            Arc::new(MemoryOtpStore::new()),
            Arc::new(MemoryUserStore::new()),
            OtpGenerator::seeded(2024, clock.clone()),
            tokens.clone(),
            Arc::new(Sha256PasswordHasher),
            create_noop_metrics().expect("noop metrics"),
        );
        state
            .seed_default_users()
            .await
            .expect("Should be able to seed users");

        let server = Self::serve(build_router(state)).await;
        ClockedServer {
            server,
            clock,
            tokens,
        }
    }

    async fn serve(app: axum::Router) -> Self {
        // ---
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start
        sleep(Duration::from_millis(100)).await;

        let client = Client::new();

        Self { addr, client }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }
}
