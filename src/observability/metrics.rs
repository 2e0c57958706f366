//! Metrics collection and exposition.
//!
//! # Metrics
//! - `modal_signals_total` (counter): signals emitted by the renderer, by kind
//! - `modal_subrequests_total` (counter): background sub-requests dispatched
//! - `modal_render_duration_seconds` (histogram): time spent in `render`
//! - `modal_client_loads_total` (counter): controller loads, by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_signal(kind: &'static str) {
    counter!("modal_signals_total", "kind" => kind).increment(1);
}

pub fn record_subrequest() {
    counter!("modal_subrequests_total").increment(1);
}

pub fn record_render(start: Instant) {
    histogram!("modal_render_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_client_load(outcome: &'static str) {
    counter!("modal_client_loads_total", "outcome" => outcome).increment(1);
}
