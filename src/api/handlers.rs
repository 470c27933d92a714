//! API request handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::diagnostics::{self, RouteCheckReport, TraceReport};
use crate::http::server::AppState;
use crate::routing::{self, SimulatedRequest, SimulationResult};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub cluster: &'static str,
}

/// Body of `POST /diagnostics/route-check`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCheckRequest {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub route_name: String,
    #[serde(default)]
    pub route_kind: Option<String>,
}

/// Body of `POST /diagnostics/trace`.
#[derive(Debug, Deserialize)]
pub struct TraceRequest {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub method: Option<String>,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        cluster: if state.accessor.is_some() {
            "connected"
        } else {
            "unconfigured"
        },
    })
}

/// Dry-run a hypothetical request against a named route.
pub async fn simulate(
    State(state): State<AppState>,
    Path((namespace, name)): Path<(String, String)>,
    payload: Result<Json<SimulatedRequest>, JsonRejection>,
) -> Result<Json<SimulationResult>, ApiError> {
    let accessor = state.accessor.as_ref().ok_or_else(ApiError::no_cluster)?;
    let Json(request) = payload?;

    if request.path.is_empty() {
        return Err(ApiError::Validation("path is required".to_string()));
    }

    let route = accessor.get_http_route(&namespace, &name)?;
    let result = routing::simulate(&route, &request);

    tracing::debug!(
        route = %route.qualified_name(),
        method = %request.method,
        path = %request.path,
        matched = result.matched,
        "Simulated request"
    );

    Ok(Json(result))
}

/// Run the six-stage health-check pipeline for a named route.
pub async fn route_check(
    State(state): State<AppState>,
    payload: Result<Json<RouteCheckRequest>, JsonRejection>,
) -> Result<Json<RouteCheckReport>, ApiError> {
    let accessor = state.accessor.as_ref().ok_or_else(ApiError::no_cluster)?;
    let Json(request) = payload?;

    if request.namespace.is_empty() || request.route_name.is_empty() {
        return Err(ApiError::Validation(
            "namespace and routeName are required".to_string(),
        ));
    }

    let report = diagnostics::run_route_check(
        accessor.as_ref(),
        &request.namespace,
        &request.route_name,
        request.route_kind.as_deref(),
    );

    tracing::debug!(
        namespace = %request.namespace,
        route = %request.route_name,
        status = ?report.status,
        "Route check completed"
    );

    Ok(Json(report))
}

/// Trace a request from an external hostname down to the winning route.
pub async fn trace(
    State(state): State<AppState>,
    payload: Result<Json<TraceRequest>, JsonRejection>,
) -> Result<Json<TraceReport>, ApiError> {
    let accessor = state.accessor.as_ref().ok_or_else(ApiError::no_cluster)?;
    let Json(request) = payload?;

    if request.host.is_empty() || request.path.is_empty() {
        return Err(ApiError::Validation(
            "host and path are required".to_string(),
        ));
    }

    let report = diagnostics::run_trace(
        accessor.as_ref(),
        &request.host,
        &request.path,
        request.method.as_deref(),
    );

    tracing::debug!(
        host = %request.host,
        path = %request.path,
        matched = report.matched,
        "Trace completed"
    );

    Ok(Json(report))
}
