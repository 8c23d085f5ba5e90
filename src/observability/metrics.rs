//! Metrics collection and exposition.
//!
//! # Metrics
//! - `site_requests_total` (counter): public requests by lookup outcome
//! - `site_request_duration_seconds` (histogram): public request latency
//! - `site_admin_requests_total` (counter): editor API calls by action, status
//! - `site_websites` (gauge): websites in the store
//! - `site_config_reloads_total` (counter): applied config reloads
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exporter runs on its own listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(outcome: &'static str, start: Instant) {
    counter!("site_requests_total", "outcome" => outcome).increment(1);
    histogram!("site_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_admin_request(action: &'static str, status: u16) {
    counter!(
        "site_admin_requests_total",
        "action" => action,
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_websites(count: usize) {
    gauge!("site_websites").set(count as f64);
}

pub fn record_config_reload() {
    counter!("site_config_reloads_total").increment(1);
}
