use std::sync::Arc;
use std::time::Instant;

/// Abstraction for application metrics (counters, histograms).
pub trait Metrics: Send + Sync + 'static {
    // ---
    /// Render current metrics in Prometheus text format.
    fn render(&self) -> String;

    /// Record the outcome of a "request a code" call.
    fn record_otp_request(&self, outcome: &str);

    /// Record the outcome of a "redeem a code" call.
    fn record_otp_redemption(&self, outcome: &str);

    /// Record the outcome of a username/password login.
    fn record_password_login(&self, outcome: &str);

    /// Record HTTP request duration and labels.
    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16);
}

/// Type alias for any backend that implements Metrics.
pub type MetricsPtr = Arc<dyn Metrics>;
