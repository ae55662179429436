//! Metrics collection and exposition.
//!
//! # Metrics
//! - `reflectsvc_requests_total` (counter): inbound requests by endpoint, status
//! - `reflectsvc_request_duration_seconds` (histogram): inbound latency
//! - `reflectsvc_relay_total` (counter): downstream outcomes by code
//! - `reflectsvc_relay_duration_seconds` (histogram): downstream latency
//! - `reflectsvc_fields_emitted` (histogram): output keys per conversion
//! - `reflectsvc_capture_failures_total` (counter): unwritten debug artifacts
//!
//! Recording is a no-op until `init_metrics` installs the recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "reflectsvc_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("reflectsvc_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_relay(code: u16, start: Instant) {
    metrics::counter!("reflectsvc_relay_total", "code" => code.to_string()).increment(1);
    metrics::histogram!("reflectsvc_relay_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_conversion(fields_emitted: usize) {
    metrics::histogram!("reflectsvc_fields_emitted").record(fields_emitted as f64);
}

pub fn record_capture_failure(kind: &'static str) {
    metrics::counter!("reflectsvc_capture_failures_total", "kind" => kind).increment(1);
}
