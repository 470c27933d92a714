//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all API handlers
//! - Wire up middleware (tracing, timeout, body limit, request ID, metrics)
//! - Bind the server to a listener and serve until shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::{DefaultBodyLimit, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::cluster::ClusterAccessor;
use crate::config::ConsoleConfig;
use crate::http::request::{MakeRequestUuid, request_id_header};
use crate::observability::metrics;

/// Application state injected into handlers.
///
/// `accessor` is `None` when the console has no cluster context; the engine
/// endpoints answer 503 until one is configured.
#[derive(Clone)]
pub struct AppState {
    pub accessor: Option<Arc<dyn ClusterAccessor>>,
}

/// HTTP server for the console API.
pub struct HttpServer {
    router: Router,
    config: ConsoleConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and cluster
    /// accessor.
    pub fn new(config: ConsoleConfig, accessor: Option<Arc<dyn ClusterAccessor>>) -> Self {
        let state = AppState { accessor };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ConsoleConfig, state: AppState) -> Router {
        api::setup_api_router(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                )))
                .layer(DefaultBodyLimit::max(config.listener.max_body_bytes))
                .layer(PropagateRequestIdLayer::new(request_id_header()))
                .layer(middleware::from_fn(track_metrics)),
        )
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }
}

/// Record one counter/histogram sample per request.
async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let endpoint = endpoint_label(request.uri().path());

    let response = next.run(request).await;

    metrics::record_request(&method, endpoint, response.status().as_u16(), start);
    response
}

/// Collapse parameterized paths into fixed labels to keep metric cardinality
/// bounded.
fn endpoint_label(path: &str) -> &'static str {
    match path {
        "/status" => "status",
        "/diagnostics/route-check" => "route-check",
        "/diagnostics/trace" => "trace",
        _ if path.ends_with("/simulate") => "simulate",
        _ => "other",
    }
}
