//! Self-telemetry for the exporter process.
//!
//! These are metrics *about* the exporter, recorded through the `metrics`
//! facade and served by `metrics-exporter-prometheus` on a separate address
//! when one is configured. They are unrelated to the balance page on
//! `/metrics`. Without an installed recorder every call is a no-op.
//!
//! # Metrics
//! - `balance_exporter_poll_cycles_total` (counter): completed polling cycles
//! - `balance_exporter_fetch_failures_total` (counter): failed balance fetches
//! - `balance_exporter_cycle_duration_seconds` (histogram): cycle wall time
//! - `balance_exporter_loaded_addresses` (gauge): successes in the last cycle
//! - `balance_exporter_registered_addresses` (gauge): registry size
//! - `balance_exporter_scrapes_total` (counter): `/metrics` requests served

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Start the Prometheus listener for process metrics.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Telemetry endpoint started");
    Ok(())
}

/// Record a completed polling cycle.
pub fn record_cycle(duration: Duration, loaded: usize, total: usize) {
    counter!("balance_exporter_poll_cycles_total").increment(1);
    histogram!("balance_exporter_cycle_duration_seconds").record(duration.as_secs_f64());
    gauge!("balance_exporter_loaded_addresses").set(loaded as f64);
    gauge!("balance_exporter_registered_addresses").set(total as f64);
}

/// Record one failed balance fetch.
pub fn record_fetch_failure() {
    counter!("balance_exporter_fetch_failures_total").increment(1);
}

/// Record one served `/metrics` request.
pub fn record_scrape() {
    counter!("balance_exporter_scrapes_total").increment(1);
}
