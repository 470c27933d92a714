//! Shared utilities for integration testing.

use std::sync::Arc;

use tokio::net::TcpListener;

use gateway_console::cluster::{ClusterAccessor, ClusterSnapshot};
use gateway_console::config::ConsoleConfig;
use gateway_console::http::HttpServer;
use gateway_console::lifecycle::Shutdown;
use gateway_console::cluster::model::{
    BackendRef, Condition, Gateway, HeaderMatch, HttpRoute, Listener, ParentRef, ParentStatus,
    PathMatch, PathMatchKind, Protocol, RouteMatch, RouteRule, RouteStatus, Service,
};

/// A running console bound to an ephemeral port.
///
/// Dropping the handle triggers graceful shutdown.
pub struct ConsoleHandle {
    pub url: String,
    _shutdown: Shutdown,
}

/// Boot a console server with the given cluster snapshot (or none at all).
pub async fn start_console(accessor: Option<ClusterSnapshot>) -> ConsoleHandle {
    let config = ConsoleConfig::default();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let accessor = accessor.map(|snapshot| Arc::new(snapshot) as Arc<dyn ClusterAccessor>);
    let server = HttpServer::new(config, accessor);

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    ConsoleHandle {
        url: format!("http://{}", addr),
        _shutdown: shutdown,
    }
}

/// Route with the classic four rules: exact /health, prefix /api with method
/// and header, regex /users/<id>, catch-all.
pub fn simulation_route() -> HttpRoute {
    HttpRoute {
        name: "test-route".into(),
        namespace: "default".into(),
        hostnames: vec![],
        parent_refs: vec![],
        rules: vec![
            RouteRule {
                matches: vec![RouteMatch {
                    path: Some(PathMatch {
                        kind: PathMatchKind::Exact,
                        value: "/health".into(),
                    }),
                    ..RouteMatch::default()
                }],
                backend_refs: vec![BackendRef {
                    name: "health-svc".into(),
                    namespace: Some("default".into()),
                    port: Some(80),
                    weight: Some(100),
                }],
            },
            RouteRule {
                matches: vec![RouteMatch {
                    path: Some(PathMatch {
                        kind: PathMatchKind::Prefix,
                        value: "/api".into(),
                    }),
                    method: Some("GET".into()),
                    headers: vec![HeaderMatch {
                        name: "X-Version".into(),
                        value: "v2".into(),
                    }],
                    query_params: vec![],
                }],
                backend_refs: vec![BackendRef {
                    name: "api-v2-svc".into(),
                    namespace: None,
                    port: None,
                    weight: None,
                }],
            },
            RouteRule {
                matches: vec![RouteMatch {
                    path: Some(PathMatch {
                        kind: PathMatchKind::Regex,
                        value: r"^/users/\d+$".into(),
                    }),
                    ..RouteMatch::default()
                }],
                backend_refs: vec![BackendRef {
                    name: "users-svc".into(),
                    namespace: None,
                    port: None,
                    weight: None,
                }],
            },
            RouteRule {
                matches: vec![],
                backend_refs: vec![BackendRef {
                    name: "default-svc".into(),
                    namespace: None,
                    port: None,
                    weight: None,
                }],
            },
        ],
        status: RouteStatus::default(),
    }
}

/// A healthy gateway + route + backend service trio.
pub fn healthy_cluster() -> ClusterSnapshot {
    let gateway = Gateway {
        name: "my-gateway".into(),
        namespace: "default".into(),
        listeners: vec![Listener {
            name: "http".into(),
            hostname: None,
            port: 80,
            protocol: Protocol::Http,
        }],
    };

    let route = HttpRoute {
        name: "my-route".into(),
        namespace: "default".into(),
        hostnames: vec!["app.example.com".into()],
        parent_refs: vec![ParentRef {
            name: "my-gateway".into(),
            namespace: None,
            section_name: None,
        }],
        rules: vec![RouteRule {
            matches: vec![RouteMatch {
                path: Some(PathMatch {
                    kind: PathMatchKind::Prefix,
                    value: "/".into(),
                }),
                ..RouteMatch::default()
            }],
            backend_refs: vec![BackendRef {
                name: "my-svc".into(),
                namespace: None,
                port: Some(80),
                weight: None,
            }],
        }],
        status: RouteStatus {
            parents: vec![ParentStatus {
                conditions: vec![
                    Condition {
                        condition_type: "Accepted".into(),
                        status: "True".into(),
                    },
                    Condition {
                        condition_type: "ResolvedRefs".into(),
                        status: "True".into(),
                    },
                ],
            }],
        },
    };

    ClusterSnapshot::new()
        .with_gateway(gateway)
        .with_route(route)
        .with_service(Service {
            name: "my-svc".into(),
            namespace: "default".into(),
        })
}
