//! Typed cluster object model.
//!
//! The surrounding management console stores Gateway API objects as
//! unstructured CRDs. The diagnostics engine works against this narrow typed
//! mirror instead, so matching logic never does map-key traversal or type
//! assertions. Only the fields the engine reads are modeled.
//!
//! # Design Decisions
//! - All types are plain data with Serde derives so cluster snapshots can be
//!   loaded from disk and echoed back in API responses
//! - Optional fields stay `Option`; defaulting rules (e.g. backend namespace
//!   falls back to the route namespace) are applied at lookup sites, not here
//! - Rule order is identity: a rule is referred to by its index in the route

use serde::{Deserialize, Serialize};

/// A logical network entry point with one or more listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gateway {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub listeners: Vec<Listener>,
}

impl Gateway {
    /// Listener with the given section name, if any.
    pub fn listener(&self, name: &str) -> Option<&Listener> {
        self.listeners.iter().find(|l| l.name == name)
    }
}

/// One host/port/protocol binding on a Gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listener {
    pub name: String,
    /// Hostname this listener serves. `None` accepts any host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub port: u16,
    pub protocol: Protocol,
}

impl Listener {
    /// Whether this listener serves the given host (exact match; a listener
    /// without a hostname serves every host).
    pub fn serves_host(&self, host: &str) -> bool {
        match &self.hostname {
            Some(hostname) => hostname == host,
            None => true,
        }
    }
}

/// Listener protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Http,
    Https,
    Tcp,
    Tls,
    Udp,
}

impl Protocol {
    /// HTTP routes can only attach to HTTP-capable listeners.
    pub fn is_http(self) -> bool {
        matches!(self, Protocol::Http | Protocol::Https)
    }
}

/// An ordered list of routing rules attached to one or more Gateways.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRoute {
    pub name: String,
    pub namespace: String,
    /// Hostnames this route serves. Empty means any host.
    #[serde(default)]
    pub hostnames: Vec<String>,
    #[serde(default)]
    pub parent_refs: Vec<ParentRef>,
    #[serde(default)]
    pub rules: Vec<RouteRule>,
    #[serde(default)]
    pub status: RouteStatus,
}

impl HttpRoute {
    /// `namespace/name` identifier used in diagnostics output.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// Whether any parentRef points at the given Gateway. A parentRef without
    /// a namespace refers to the route's own namespace.
    pub fn attached_to(&self, gateway: &Gateway) -> bool {
        self.parent_refs.iter().any(|parent| {
            parent.name == gateway.name
                && parent.namespace.as_deref().unwrap_or(&self.namespace) == gateway.namespace
        })
    }

    /// Whether this route serves the given host (empty hostname set serves
    /// every host).
    pub fn serves_host(&self, host: &str) -> bool {
        self.hostnames.is_empty() || self.hostnames.iter().any(|h| h == host)
    }
}

/// Reference from a route to the Gateway it attaches to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Listener name to bind to. `None` binds to any compatible listener.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
}

/// One routing decision unit: match predicates plus a backend set.
///
/// A rule with no predicates is a catch-all and matches every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteRule {
    #[serde(default)]
    pub matches: Vec<RouteMatch>,
    #[serde(default)]
    pub backend_refs: Vec<BackendRef>,
}

/// One match predicate. All present fields must hold for the predicate to
/// pass; predicates within a rule are OR-ed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub headers: Vec<HeaderMatch>,
    #[serde(default)]
    pub query_params: Vec<QueryParamMatch>,
}

/// Path predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathMatch {
    #[serde(rename = "type")]
    pub kind: PathMatchKind,
    pub value: String,
}

/// How a path predicate compares against the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathMatchKind {
    Exact,
    Prefix,
    Regex,
}

/// Header predicate: name lookup is case-insensitive, value comparison is
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderMatch {
    pub name: String,
    pub value: String,
}

/// Query parameter predicate: name and value both case-sensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParamMatch {
    pub name: String,
    pub value: String,
}

/// A named service + port + informational weight that matched traffic is
/// sent to. Weight is never used for selection here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

/// Status reported on the route by its controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteStatus {
    #[serde(default)]
    pub parents: Vec<ParentStatus>,
}

/// Per-parent status entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParentStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl ParentStatus {
    /// Status string of the named condition, if reported.
    pub fn condition(&self, condition_type: &str) -> Option<&str> {
        self.conditions
            .iter()
            .find(|c| c.condition_type == condition_type)
            .map(|c| c.status.as_str())
    }
}

/// A single status condition, `status` being `"True"`, `"False"` or
/// `"Unknown"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
}

/// A backend Service. Existence is all the engine checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub namespace: String,
}
