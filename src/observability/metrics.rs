//! Metrics collection and exposition.
//!
//! # Metrics
//! - `otlp_requests_total` (counter): requests by route and outcome
//! - `otlp_spans_received_total` (counter): spans seen in JSON payloads
//! - `otlp_payload_bytes` (histogram): body sizes of trace submissions
//! - `otlp_persist_failures_total` (counter): trace dumps that could not be written
//!
//! Recording is always on; without an installed recorder the calls are no-ops.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &'static str, outcome: &'static str) {
    counter!("otlp_requests_total", "route" => route, "outcome" => outcome).increment(1);
}

pub fn record_spans(count: usize) {
    counter!("otlp_spans_received_total").increment(count as u64);
}

pub fn record_payload_size(bytes: usize) {
    histogram!("otlp_payload_bytes").record(bytes as f64);
}

pub fn record_persist_failure() {
    counter!("otlp_persist_failures_total").increment(1);
}
