//! Diagnostics subsystem.
//!
//! # Data Flow
//! ```text
//! route-check request (namespace, routeName, routeKind?)
//!     → route_check.rs (6 fixed stages, skip after first failure)
//!     → RouteCheckReport { healthy|unhealthy, checks[] }
//!
//! trace request (host, path, method?)
//!     → trace.rs (4 fixed steps: gateway → listener → route → rules)
//!     → TraceReport { matched, matchedRoute?, steps[] }
//! ```
//!
//! # Design Decisions
//! - Pipelines never raise: missing objects become fail entries, later
//!   stages become skip entries, and the report is still HTTP 200
//! - Only the first stage is unconditional; a failing stage stops all
//!   further cluster lookups
//! - Both pipelines read through the same `ClusterAccessor` the simulator
//!   uses, with no caching between requests

pub mod route_check;
pub mod trace;

use serde::Serialize;

pub use route_check::{RouteCheckReport, run_route_check};
pub use trace::{TraceReport, run_trace};

/// Status of a single check or step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skip,
}

/// Overall verdict of a route-check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Unhealthy,
}
