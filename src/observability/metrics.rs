//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): dispatched requests by outcome, status
//! - `gateway_request_duration_seconds` (histogram): dispatch latency by outcome
//!
//! Outcomes are `proxied`, `proxy_error`, `api_maintenance` and
//! `maintenance_page`. Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "gateway_requests_total";
pub const REQUEST_DURATION: &str = "gateway_request_duration_seconds";

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_dispatch(outcome: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(REQUESTS_TOTAL, "outcome" => outcome, "status" => status.to_string())
        .increment(1);
    ::metrics::histogram!(REQUEST_DURATION, "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
