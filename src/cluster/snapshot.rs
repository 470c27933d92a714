//! Snapshot-backed cluster accessor.
//!
//! # Responsibilities
//! - Serve `ClusterAccessor` lookups from an immutable in-memory snapshot
//! - Load snapshots from a JSON file for development mode
//! - Provide a builder for tests that need a cluster in a known state
//!
//! # Design Decisions
//! - Object order in the snapshot is lookup order; list calls return clones
//!   of the stored objects so callers can never alias internal state
//! - A snapshot never reports `Unavailable`; that path is exercised through
//!   the dedicated `UnreachableCluster` test accessor

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::cluster::accessor::{ClusterAccessor, ClusterError};
use crate::cluster::model::{Gateway, HttpRoute, Service};

/// Error loading a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse snapshot file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable collection of cluster objects backing the accessor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterSnapshot {
    #[serde(default)]
    gateways: Vec<Gateway>,
    #[serde(default)]
    routes: Vec<HttpRoute>,
    #[serde(default)]
    services: Vec<Service>,
}

impl ClusterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&content)?;
        Ok(snapshot)
    }

    pub fn with_gateway(mut self, gateway: Gateway) -> Self {
        self.gateways.push(gateway);
        self
    }

    pub fn with_route(mut self, route: HttpRoute) -> Self {
        self.routes.push(route);
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }
}

impl ClusterAccessor for ClusterSnapshot {
    fn get_http_route(&self, namespace: &str, name: &str) -> Result<HttpRoute, ClusterError> {
        self.routes
            .iter()
            .find(|r| r.namespace == namespace && r.name == name)
            .cloned()
            .ok_or_else(|| ClusterError::not_found("HTTPRoute", namespace, name))
    }

    fn get_gateway(&self, namespace: &str, name: &str) -> Result<Gateway, ClusterError> {
        self.gateways
            .iter()
            .find(|g| g.namespace == namespace && g.name == name)
            .cloned()
            .ok_or_else(|| ClusterError::not_found("Gateway", namespace, name))
    }

    fn get_service(&self, namespace: &str, name: &str) -> Result<Service, ClusterError> {
        self.services
            .iter()
            .find(|s| s.namespace == namespace && s.name == name)
            .cloned()
            .ok_or_else(|| ClusterError::not_found("Service", namespace, name))
    }

    fn list_gateways(&self) -> Result<Vec<Gateway>, ClusterError> {
        Ok(self.gateways.clone())
    }

    fn list_http_routes(&self) -> Result<Vec<HttpRoute>, ClusterError> {
        Ok(self.routes.clone())
    }
}

/// Accessor that reports the cluster as unreachable for every call.
///
/// Lets tests drive the `Unavailable` error path without a real cluster.
#[derive(Debug, Clone, Default)]
pub struct UnreachableCluster;

impl ClusterAccessor for UnreachableCluster {
    fn get_http_route(&self, _namespace: &str, _name: &str) -> Result<HttpRoute, ClusterError> {
        Err(ClusterError::Unavailable("connection refused".into()))
    }

    fn get_gateway(&self, _namespace: &str, _name: &str) -> Result<Gateway, ClusterError> {
        Err(ClusterError::Unavailable("connection refused".into()))
    }

    fn get_service(&self, _namespace: &str, _name: &str) -> Result<Service, ClusterError> {
        Err(ClusterError::Unavailable("connection refused".into()))
    }

    fn list_gateways(&self) -> Result<Vec<Gateway>, ClusterError> {
        Err(ClusterError::Unavailable("connection refused".into()))
    }

    fn list_http_routes(&self) -> Result<Vec<HttpRoute>, ClusterError> {
        Err(ClusterError::Unavailable("connection refused".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::model::{Listener, Protocol, RouteStatus};

    fn snapshot() -> ClusterSnapshot {
        ClusterSnapshot::new()
            .with_gateway(Gateway {
                name: "edge".into(),
                namespace: "infra".into(),
                listeners: vec![Listener {
                    name: "http".into(),
                    hostname: None,
                    port: 80,
                    protocol: Protocol::Http,
                }],
            })
            .with_service(Service {
                name: "web-svc".into(),
                namespace: "default".into(),
            })
    }

    #[test]
    fn lookup_hits_and_misses() {
        let snap = snapshot();

        assert!(snap.get_gateway("infra", "edge").is_ok());
        assert!(snap.get_service("default", "web-svc").is_ok());

        let err = snap.get_gateway("infra", "missing").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Gateway infra/missing not found");

        // Same name, wrong namespace is still a miss.
        assert!(snap.get_service("infra", "web-svc").is_err());
    }

    #[test]
    fn list_preserves_insertion_order() {
        let snap = ClusterSnapshot::new()
            .with_gateway(Gateway {
                name: "a".into(),
                namespace: "default".into(),
                listeners: vec![],
            })
            .with_gateway(Gateway {
                name: "b".into(),
                namespace: "default".into(),
                listeners: vec![],
            });

        let names: Vec<String> = snap
            .list_gateways()
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn snapshot_parses_from_json() {
        let json = r#"{
            "gateways": [
                {
                    "name": "edge",
                    "namespace": "infra",
                    "listeners": [
                        {"name": "http", "port": 80, "protocol": "HTTP"}
                    ]
                }
            ],
            "routes": [
                {
                    "name": "web",
                    "namespace": "default",
                    "hostnames": ["app.example.com"],
                    "parent_refs": [{"name": "edge", "namespace": "infra"}],
                    "rules": [
                        {
                            "matches": [
                                {"path": {"type": "Prefix", "value": "/"}}
                            ],
                            "backend_refs": [{"name": "web-svc", "port": 80}]
                        }
                    ]
                }
            ],
            "services": [
                {"name": "web-svc", "namespace": "default"}
            ]
        }"#;

        let snap: ClusterSnapshot = serde_json::from_str(json).unwrap();
        let route = snap.get_http_route("default", "web").unwrap();
        assert_eq!(route.hostnames, vec!["app.example.com"]);
        assert_eq!(route.rules.len(), 1);
        assert_eq!(route.status, RouteStatus::default());
    }

    #[test]
    fn unreachable_cluster_reports_unavailable() {
        let err = UnreachableCluster.list_gateways().unwrap_err();
        assert!(matches!(err, ClusterError::Unavailable(_)));
    }
}
