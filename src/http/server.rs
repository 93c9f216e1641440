//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the `/metrics` handler
//! - Wire up middleware (tracing, request timeout)
//! - Serve on a bound listener until shutdown

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::balances::SnapshotStore;
use crate::http::exporter::{self, CONTENT_TYPE};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub prefix: Arc<str>,
}

/// HTTP server exposing the balance page.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server reading from `store`.
    pub fn new(store: Arc<SnapshotStore>, prefix: &str, request_timeout: Duration) -> Self {
        let state = AppState {
            store,
            prefix: Arc::from(prefix),
        };

        Self {
            router: Self::build_router(state, request_timeout),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http())
    }

    /// The configured router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server shutting down");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `GET /metrics`: render the most recently published snapshot.
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.current();
    metrics::record_scrape();
    (
        [(header::CONTENT_TYPE, CONTENT_TYPE)],
        exporter::render(&snapshot, &state.prefix),
    )
}
