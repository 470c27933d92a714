//! Metrics collection and exposition.
//!
//! # Metrics
//! - `console_requests_total` (counter): requests by method, endpoint, status
//! - `console_request_duration_seconds` (histogram): latency by endpoint
//!
//! # Design Decisions
//! - Endpoint labels are fixed strings, never raw paths, so cardinality
//!   stays bounded
//! - Exposition is a separate Prometheus scrape listener so the API bind
//!   address stays dedicated to the console itself

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Failure to bind is logged, not fatal: the console can serve without
/// metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!(
                "console_requests_total",
                "Total API requests by method, endpoint and status"
            );
            describe_histogram!(
                "console_request_duration_seconds",
                "API request latency by endpoint"
            );
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Record one completed request.
pub fn record_request(method: &str, endpoint: &'static str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("endpoint", endpoint.to_string()),
        ("status", status.to_string()),
    ];
    counter!("console_requests_total", &labels).increment(1);
    histogram!("console_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}
