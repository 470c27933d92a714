//! API subsystem.
//!
//! # Data Flow
//! ```text
//! JSON request
//!     → mod.rs (route table)
//!     → handlers.rs (validate body, fetch via ClusterAccessor, run engine)
//!     → error.rs (ApiError → 400/404/503 with {"error"} body)
//! ```
//!
//! # Design Decisions
//! - Engine verdicts (unhealthy, not matched) are 200s with structured bodies
//! - 503 means "no cluster accessor", 404 means "named route absent";
//!   the two are never conflated

pub mod error;
pub mod handlers;

use axum::Router;
use axum::routing::{get, post};

use crate::http::server::AppState;
use self::handlers::{get_status, route_check, simulate, trace};

/// Build the console API router.
pub fn setup_api_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/{namespace}/{name}/simulate", post(simulate))
        .route("/diagnostics/route-check", post(route_check))
        .route("/diagnostics/trace", post(trace))
        .with_state(state)
}
