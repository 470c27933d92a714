//! Hostname-to-route request tracing.
//!
//! # Responsibilities
//! - Resolve an external hostname down to the Gateway listener serving it
//! - Find the HTTPRoute attached to that Gateway for the host
//! - Replay the request against the route's rules via the rule matcher
//!
//! # Steps
//! ```text
//! Gateway Listener Match → Listener Ready → Route Hostname Match → Rule Match
//! ```
//!
//! The same skip-on-first-failure discipline as the route-check pipeline
//! applies; candidates are taken in accessor list order and the first match
//! wins at each step.

use serde::Serialize;

use crate::cluster::accessor::ClusterAccessor;
use crate::cluster::model::{Gateway, HttpRoute, Listener};
use crate::diagnostics::CheckStatus;
use crate::routing::matcher::SimulatedRequest;
use crate::routing::simulator;

/// The fixed step names, in pipeline order.
pub const STEP_NAMES: [&str; 4] = [
    "Gateway Listener Match",
    "Listener Ready",
    "Route Hostname Match",
    "Rule Match",
];

/// Report for one trace run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceReport {
    pub matched: bool,

    /// `namespace/name` of the winning route, present only on a full match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_route: Option<String>,

    pub steps: Vec<TraceStep>,
}

/// One named step with its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct TraceStep {
    pub name: String,
    pub status: CheckStatus,
}

/// Trace a hypothetical request from an external hostname down to the
/// winning route.
pub fn run_trace(
    accessor: &dyn ClusterAccessor,
    host: &str,
    path: &str,
    method: Option<&str>,
) -> TraceReport {
    let mut steps: Vec<TraceStep> = Vec::with_capacity(STEP_NAMES.len());

    // Step 1: a Gateway listener serving this host.
    let (gateway, listener) = match find_listener(accessor, host) {
        Some(found) => {
            steps.push(pass(STEP_NAMES[0]));
            found
        }
        None => {
            steps.push(fail(STEP_NAMES[0]));
            return finish(steps, None);
        }
    };

    // Step 2: the listener must be in a usable state for HTTP traffic.
    if listener.protocol.is_http() && listener.port != 0 {
        steps.push(pass(STEP_NAMES[1]));
    } else {
        steps.push(fail(STEP_NAMES[1]));
        return finish(steps, None);
    }

    // Step 3: an HTTPRoute attached to that Gateway serving this host.
    let route = match find_route(accessor, &gateway, host) {
        Some(route) => {
            steps.push(pass(STEP_NAMES[2]));
            route
        }
        None => {
            steps.push(fail(STEP_NAMES[2]));
            return finish(steps, None);
        }
    };

    // Step 4: at least one rule must match the request.
    let request = SimulatedRequest::new(method.unwrap_or("GET"), path);
    if simulator::simulate(&route, &request).matched {
        steps.push(pass(STEP_NAMES[3]));
        let matched_route = route.qualified_name();
        finish(steps, Some(matched_route))
    } else {
        steps.push(fail(STEP_NAMES[3]));
        finish(steps, None)
    }
}

fn pass(name: &str) -> TraceStep {
    TraceStep {
        name: name.to_string(),
        status: CheckStatus::Pass,
    }
}

fn fail(name: &str) -> TraceStep {
    TraceStep {
        name: name.to_string(),
        status: CheckStatus::Fail,
    }
}

/// Pad unevaluated steps with skip entries and assemble the report.
fn finish(mut steps: Vec<TraceStep>, matched_route: Option<String>) -> TraceReport {
    for name in &STEP_NAMES[steps.len()..] {
        steps.push(TraceStep {
            name: name.to_string(),
            status: CheckStatus::Skip,
        });
    }

    TraceReport {
        matched: matched_route.is_some(),
        matched_route,
        steps,
    }
}

/// First (gateway, listener) pair whose listener serves the host. A listener
/// without a hostname serves any host.
fn find_listener(accessor: &dyn ClusterAccessor, host: &str) -> Option<(Gateway, Listener)> {
    let gateways = accessor.list_gateways().ok()?;
    for gateway in gateways {
        if let Some(listener) = gateway.listeners.iter().find(|l| l.serves_host(host)) {
            let listener = listener.clone();
            return Some((gateway, listener));
        }
    }
    None
}

/// First route attached to the Gateway whose hostname set covers the host.
fn find_route(accessor: &dyn ClusterAccessor, gateway: &Gateway, host: &str) -> Option<HttpRoute> {
    accessor
        .list_http_routes()
        .ok()?
        .into_iter()
        .find(|route| route.attached_to(gateway) && route.serves_host(host))
}
