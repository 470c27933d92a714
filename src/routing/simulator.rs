//! Dry-run simulation of route matching.
//!
//! # Responsibilities
//! - Walk a route's rules in order and record a trace entry for every rule
//! - Pick the first fully matching rule and surface its backends
//!
//! # Design Decisions
//! - The trace is never short-circuited: every rule gets an entry even after
//!   a match, so operators can see shadowed rules
//! - Pure and deterministic; route-not-found and missing-cluster concerns
//!   belong to the HTTP layer

use serde::Serialize;

use crate::cluster::model::{BackendRef, HttpRoute};
use crate::routing::matcher::{self, SimulatedRequest};

/// Result of simulating one request against one route.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Whether any rule matched.
    pub matched: bool,

    /// Index of the winning rule, when one matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_rule_index: Option<usize>,

    /// Backends of the winning rule in declared order; empty when no match.
    pub backends: Vec<BackendRef>,

    /// One entry per rule, in rule order.
    pub per_rule_trace: Vec<RuleTrace>,
}

/// Trace entry for a single rule.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTrace {
    pub rule_index: usize,
    pub matched: bool,
    pub reason: String,
}

/// Evaluate every rule of the route against the request.
///
/// The winning rule is the lowest-indexed match; later rules are still
/// evaluated for the trace.
pub fn simulate(route: &HttpRoute, request: &SimulatedRequest) -> SimulationResult {
    let mut matched_rule_index = None;
    let mut per_rule_trace = Vec::with_capacity(route.rules.len());

    for (index, rule) in route.rules.iter().enumerate() {
        let outcome = matcher::match_rule(rule, request);
        if outcome.matched && matched_rule_index.is_none() {
            matched_rule_index = Some(index);
        }
        per_rule_trace.push(RuleTrace {
            rule_index: index,
            matched: outcome.matched,
            reason: outcome.reason,
        });
    }

    let backends = matched_rule_index
        .map(|index| route.rules[index].backend_refs.clone())
        .unwrap_or_default();

    SimulationResult {
        matched: matched_rule_index.is_some(),
        matched_rule_index,
        backends,
        per_rule_trace,
    }
}
