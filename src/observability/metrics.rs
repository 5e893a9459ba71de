//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_hostname_decisions_total` (counter): terminal action per request
//!   (`redirect`, `forward_plain`, `forward_dnslink`, `forward_subdomain`,
//!   `passthrough`, `not_found`, `bad_request`)
//! - `gateway_dnslink_lookups_total` (counter): `found`, `absent`, `error`
//! - `gateway_upstream_requests_total` (counter): upstream status code
//!
//! # Design Decisions
//! - Metric updates are no-ops until a recorder is installed
//! - Prometheus exposition on a dedicated listener

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(action: &'static str) {
    metrics::counter!("gateway_hostname_decisions_total", "action" => action).increment(1);
}

pub fn record_dnslink_lookup(result: &'static str) {
    metrics::counter!("gateway_dnslink_lookups_total", "result" => result).increment(1);
}

pub fn record_upstream(status: u16) {
    metrics::counter!("gateway_upstream_requests_total", "status" => status.to_string())
        .increment(1);
}
