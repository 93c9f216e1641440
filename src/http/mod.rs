//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing and timeout layers)
//!     → GET /metrics handler (one SnapshotStore::current per request)
//!     → exporter.rs (render snapshot to text)
//!     → Send to client
//! ```

pub mod exporter;
pub mod server;

pub use exporter::render;
pub use server::{AppState, HttpServer};
