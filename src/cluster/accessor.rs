//! Read-only cluster access boundary.
//!
//! # Responsibilities
//! - Define the narrow lookup interface the diagnostics engine depends on
//! - Distinguish "object not found" from "cluster unavailable" so the HTTP
//!   layer can choose between 404 and 503
//!
//! # Design Decisions
//! - Strictly read-only: the engine never mutates cluster state
//! - Synchronous calls; all work is request-scoped, so no locking is needed
//! - Live kube-backed implementations are external collaborators; this crate
//!   ships only the snapshot-backed one (see `snapshot.rs`)

use thiserror::Error;

use crate::cluster::model::{Gateway, HttpRoute, Service};

/// Errors surfaced by cluster lookups.
#[derive(Debug, Clone, Error)]
pub enum ClusterError {
    /// The named object does not exist in the cluster.
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    /// The cluster could not be reached at all.
    #[error("cluster unavailable: {0}")]
    Unavailable(String),
}

impl ClusterError {
    pub fn not_found(kind: &'static str, namespace: &str, name: &str) -> Self {
        ClusterError::NotFound {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClusterError::NotFound { .. })
    }
}

/// Read-only lookups against the cluster.
///
/// Implementations must be cheap to call repeatedly: the pipelines perform
/// one lookup per stage and never cache across requests.
pub trait ClusterAccessor: Send + Sync {
    /// Fetch an HTTPRoute by namespace and name.
    fn get_http_route(&self, namespace: &str, name: &str) -> Result<HttpRoute, ClusterError>;

    /// Fetch a Gateway by namespace and name.
    fn get_gateway(&self, namespace: &str, name: &str) -> Result<Gateway, ClusterError>;

    /// Fetch a Service by namespace and name.
    fn get_service(&self, namespace: &str, name: &str) -> Result<Service, ClusterError>;

    /// All Gateways, in a stable order.
    fn list_gateways(&self) -> Result<Vec<Gateway>, ClusterError>;

    /// All HTTPRoutes, in a stable order.
    fn list_http_routes(&self) -> Result<Vec<HttpRoute>, ClusterError>;
}
