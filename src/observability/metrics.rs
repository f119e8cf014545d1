//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, service
//! - `proxy_request_duration_seconds` (histogram): latency distribution
//!
//! The `service` label is the routed service name, `none` for diagnostic
//! responses and `preflight` for CORS preflights.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener. Call once at
/// startup; failures are logged, never fatal.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to start metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, service: &str, start_time: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("service", service.to_string()),
    ];

    metrics::counter!("proxy_requests_total", &labels).increment(1);
    metrics::histogram!("proxy_request_duration_seconds", &labels)
        .record(start_time.elapsed().as_secs_f64());
}
