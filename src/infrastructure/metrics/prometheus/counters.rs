use metrics::{counter, histogram};
use std::time::Instant;

/// Count "request a code" calls by outcome (issued, reissued, reused, rejected, failed).
pub fn increment_otp_request(outcome: &str) {
    counter!("otp_requests_total", "outcome" => outcome.to_string()).increment(1);
}

/// Count "redeem a code" calls by outcome (success, invalid, expired, rejected, failed).
pub fn increment_otp_redemption(outcome: &str) {
    counter!("otp_redemptions_total", "outcome" => outcome.to_string()).increment(1);
}

/// Count password logins by outcome.
pub fn increment_password_login(outcome: &str) {
    counter!("password_logins_total", "outcome" => outcome.to_string()).increment(1);
}

/// Track HTTP request latency using a histogram.
pub fn track_http_request(start: Instant, path: &str, method: &str, status: u16) {
    let elapsed = start.elapsed();
    histogram!(
        "http_request_duration_seconds",
        "path" => path.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .record(elapsed);
}
