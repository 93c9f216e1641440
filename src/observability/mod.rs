//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms about the exporter itself)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Optional telemetry endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
