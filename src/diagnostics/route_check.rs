//! Route health-check pipeline.
//!
//! # Responsibilities
//! - Diagnose why a named route is or isn't serving traffic
//! - Run six fixed checks in order, skipping everything after the first
//!   failure so no lookup runs against state already known to be broken
//!
//! # Stages
//! ```text
//! Route Exists → Parent Gateway Attached → Listener Match
//!     → Backend Health → Route Accepted → Route Resolved
//! ```
//!
//! An unsupported route kind short-circuits the whole pipeline into a single
//! skipped check; that is a distinct early exit, not six skips.

use serde::Serialize;

use crate::cluster::accessor::ClusterAccessor;
use crate::cluster::model::{Gateway, HttpRoute, ParentRef};
use crate::diagnostics::{CheckStatus, OverallStatus};

/// The fixed check names, in pipeline order.
pub const CHECK_NAMES: [&str; 6] = [
    "Route Exists",
    "Parent Gateway Attached",
    "Listener Match",
    "Backend Health",
    "Route Accepted",
    "Route Resolved",
];

/// The one route kind this pipeline knows how to check.
pub const SUPPORTED_ROUTE_KIND: &str = "HTTPRoute";

/// Full report for one route-check run.
#[derive(Debug, Clone, Serialize)]
pub struct RouteCheckReport {
    pub status: OverallStatus,
    pub checks: Vec<DiagnosticCheck>,
}

/// One named check with its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticCheck {
    pub name: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DiagnosticCheck {
    fn pass(name: &str, message: String) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            message: Some(message),
        }
    }

    fn fail(name: &str, message: String) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            message: Some(message),
        }
    }

    fn skip(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Skip,
            message: None,
        }
    }
}

/// Run the pipeline for the named route.
///
/// `route_kind` of `None` is treated as the supported kind; anything else
/// terminates immediately with a single skipped check and an unhealthy
/// verdict.
pub fn run_route_check(
    accessor: &dyn ClusterAccessor,
    namespace: &str,
    route_name: &str,
    route_kind: Option<&str>,
) -> RouteCheckReport {
    if let Some(kind) = route_kind {
        if kind != SUPPORTED_ROUTE_KIND {
            return RouteCheckReport {
                status: OverallStatus::Unhealthy,
                checks: vec![DiagnosticCheck {
                    name: "Route Kind Supported".to_string(),
                    status: CheckStatus::Skip,
                    message: Some(format!(
                        "route kind {kind} is not supported; only {SUPPORTED_ROUTE_KIND} can be checked"
                    )),
                }],
            };
        }
    }

    let mut checks: Vec<DiagnosticCheck> = Vec::with_capacity(CHECK_NAMES.len());

    // Stage 1: Route Exists. The only stage that always runs.
    let route = match accessor.get_http_route(namespace, route_name) {
        Ok(route) => {
            checks.push(DiagnosticCheck::pass(
                CHECK_NAMES[0],
                format!("HTTPRoute {namespace}/{route_name} found"),
            ));
            route
        }
        Err(err) => {
            checks.push(DiagnosticCheck::fail(CHECK_NAMES[0], err.to_string()));
            return finish(checks);
        }
    };

    // Stage 2: Parent Gateway Attached.
    let (parent, gateway) = match resolve_parent_gateway(accessor, &route) {
        Ok(pair) => {
            checks.push(DiagnosticCheck::pass(
                CHECK_NAMES[1],
                format!("attached to Gateway {}/{}", pair.1.namespace, pair.1.name),
            ));
            pair
        }
        Err(message) => {
            checks.push(DiagnosticCheck::fail(CHECK_NAMES[1], message));
            return finish(checks);
        }
    };

    // Stage 3: Listener Match.
    match listener_for_parent(&gateway, &parent) {
        Ok(listener_name) => checks.push(DiagnosticCheck::pass(
            CHECK_NAMES[2],
            format!("listener {listener_name} accepts this route"),
        )),
        Err(message) => {
            checks.push(DiagnosticCheck::fail(CHECK_NAMES[2], message));
            return finish(checks);
        }
    }

    // Stage 4: Backend Health — every referenced Service must exist.
    match check_backends(accessor, &route) {
        Ok(count) => checks.push(DiagnosticCheck::pass(
            CHECK_NAMES[3],
            if count == 0 {
                "route references no backends".to_string()
            } else {
                format!("all {count} backend services exist")
            },
        )),
        Err(message) => {
            checks.push(DiagnosticCheck::fail(CHECK_NAMES[3], message));
            return finish(checks);
        }
    }

    // Stages 5 and 6: controller-reported conditions on the first parent
    // status entry.
    for (name, condition_type) in [
        (CHECK_NAMES[4], "Accepted"),
        (CHECK_NAMES[5], "ResolvedRefs"),
    ] {
        match check_condition(&route, condition_type) {
            Ok(()) => checks.push(DiagnosticCheck::pass(
                name,
                format!("{condition_type} condition is True"),
            )),
            Err(message) => {
                checks.push(DiagnosticCheck::fail(name, message));
                return finish(checks);
            }
        }
    }

    finish(checks)
}

/// Pad unevaluated stages with skip entries and compute the verdict.
fn finish(mut checks: Vec<DiagnosticCheck>) -> RouteCheckReport {
    for name in &CHECK_NAMES[checks.len()..] {
        checks.push(DiagnosticCheck::skip(name));
    }

    let healthy = checks.iter().all(|c| c.status == CheckStatus::Pass);
    RouteCheckReport {
        status: if healthy {
            OverallStatus::Healthy
        } else {
            OverallStatus::Unhealthy
        },
        checks,
    }
}

fn resolve_parent_gateway(
    accessor: &dyn ClusterAccessor,
    route: &HttpRoute,
) -> Result<(ParentRef, Gateway), String> {
    let parent = route
        .parent_refs
        .first()
        .ok_or_else(|| "route has no parent Gateway references".to_string())?;

    let namespace = parent.namespace.as_deref().unwrap_or(&route.namespace);
    let gateway = accessor
        .get_gateway(namespace, &parent.name)
        .map_err(|e| e.to_string())?;

    Ok((parent.clone(), gateway))
}

fn listener_for_parent(gateway: &Gateway, parent: &ParentRef) -> Result<String, String> {
    match &parent.section_name {
        Some(section) => match gateway.listener(section) {
            Some(listener) => Ok(listener.name.clone()),
            None => Err(format!(
                "Gateway {}/{} has no listener named {section}",
                gateway.namespace, gateway.name
            )),
        },
        None => gateway
            .listeners
            .iter()
            .find(|l| l.protocol.is_http())
            .map(|l| l.name.clone())
            .ok_or_else(|| {
                format!(
                    "Gateway {}/{} has no HTTP or HTTPS listener",
                    gateway.namespace, gateway.name
                )
            }),
    }
}

fn check_backends(accessor: &dyn ClusterAccessor, route: &HttpRoute) -> Result<usize, String> {
    let mut count = 0;
    for rule in &route.rules {
        for backend in &rule.backend_refs {
            let namespace = backend.namespace.as_deref().unwrap_or(&route.namespace);
            accessor
                .get_service(namespace, &backend.name)
                .map_err(|e| e.to_string())?;
            count += 1;
        }
    }
    Ok(count)
}

fn check_condition(route: &HttpRoute, condition_type: &str) -> Result<(), String> {
    let parent_status = route
        .status
        .parents
        .first()
        .ok_or_else(|| "route reports no parent status".to_string())?;

    match parent_status.condition(condition_type) {
        Some("True") => Ok(()),
        Some(other) => Err(format!("{condition_type} condition is {other}")),
        None => Err(format!("{condition_type} condition not reported")),
    }
}
