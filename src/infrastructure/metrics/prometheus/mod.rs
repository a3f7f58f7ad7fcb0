mod counters;
mod prometheus_metrics;
mod recorder;

pub use prometheus_metrics::PrometheusMetrics;
use std::sync::Arc;

// Re-export utilities for internal use within this module
pub(crate) use counters::{
    increment_otp_redemption, increment_otp_request, increment_password_login, track_http_request,
};
pub(crate) use recorder::{init_metrics, render_metrics};

/// Creates a new Prometheus metrics implementation.
///
/// Installs the global recorder on first use; series are exposed through the
/// `/metrics` endpoint.
pub fn create() -> anyhow::Result<crate::domain::MetricsPtr> {
    tracing::info!("Initializing Prometheus metrics");
    init_metrics()?;

    Ok(Arc::new(PrometheusMetrics::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_is_repeatable_and_renders_counters() {
        let first = create().unwrap();
        let second = create().unwrap();

        first.record_otp_request("issued");
        second.record_otp_redemption("expired");

        let text = first.render();
        assert!(text.contains("otp_requests_total"), "{text}");
        assert!(text.contains("otp_redemptions_total"), "{text}");
    }
}
