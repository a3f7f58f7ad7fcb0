//! Prometheus metrics implementation.
//!
//! This module provides a concrete implementation of the `Metrics` trait using
//! the Prometheus metrics format. It delegates to utility functions in sibling
//! modules (`counters.rs`, `recorder.rs`) which handle the actual metrics
//! collection via the global `metrics` crate registry.

use crate::domain::Metrics;
use std::time::Instant;

/// Prometheus-based metrics implementation.
///
/// Empty because all series live in the global `metrics` registry; the
/// handle in `recorder.rs` renders them.
pub struct PrometheusMetrics {}

impl PrometheusMetrics {
    pub fn new() -> Self {
        tracing::info!("Creating Prometheus metrics");
        PrometheusMetrics {}
    }
}

impl Metrics for PrometheusMetrics {
    fn render(&self) -> String {
        super::render_metrics()
    }

    fn record_otp_request(&self, outcome: &str) {
        tracing::debug!("Recording OTP request: {outcome}");
        super::increment_otp_request(outcome);
    }

    fn record_otp_redemption(&self, outcome: &str) {
        tracing::debug!("Recording OTP redemption: {outcome}");
        super::increment_otp_redemption(outcome);
    }

    fn record_password_login(&self, outcome: &str) {
        tracing::debug!("Recording password login: {outcome}");
        super::increment_password_login(outcome);
    }

    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16) {
        super::track_http_request(start, path, method, status);
    }
}
