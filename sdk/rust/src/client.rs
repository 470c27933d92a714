use std::collections::HashMap;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// One trace entry from a simulation, covering a single rule.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTrace {
    pub rule_index: usize,
    pub matched: bool,
    pub reason: String,
}

/// Backend reference reported for the winning rule.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backend {
    pub name: String,
    pub namespace: Option<String>,
    pub port: Option<u16>,
    pub weight: Option<i32>,
}

/// Response of `POST /{namespace}/{name}/simulate`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    pub matched: bool,
    pub matched_rule_index: Option<usize>,
    pub backends: Vec<Backend>,
    pub per_rule_trace: Vec<RuleTrace>,
}

/// One named check from a route-check run.
#[derive(Debug, Serialize, Deserialize)]
pub struct Check {
    pub name: String,
    pub status: String,
    pub message: Option<String>,
}

/// Response of `POST /diagnostics/route-check`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteCheckOutcome {
    pub status: String,
    pub checks: Vec<Check>,
}

/// One named step from a trace run.
#[derive(Debug, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub status: String,
}

/// Response of `POST /diagnostics/trace`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceOutcome {
    pub matched: bool,
    pub matched_route: Option<String>,
    pub steps: Vec<Step>,
}

/// Thin client over the console's JSON API.
pub struct ConsoleClient {
    client: Client,
    console_url: String,
}

impl ConsoleClient {
    pub fn new(console_url: &str) -> Self {
        Self {
            client: Client::new(),
            console_url: console_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch console status (version, cluster connectivity).
    pub async fn status(&self) -> Result<Value, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/status", self.console_url))
            .send()
            .await?;
        Ok(resp.json().await?)
    }

    /// Simulate a request against a named route.
    pub async fn simulate(
        &self,
        namespace: &str,
        name: &str,
        method: &str,
        path: &str,
        headers: &HashMap<String, String>,
    ) -> Result<SimulationOutcome, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .post(format!(
                "{}/{}/{}/simulate",
                self.console_url, namespace, name
            ))
            .json(&json!({
                "method": method,
                "path": path,
                "headers": headers,
            }))
            .send()
            .await?;

        decode(resp).await
    }

    /// Run the route health-check pipeline.
    pub async fn route_check(
        &self,
        namespace: &str,
        route_name: &str,
        route_kind: Option<&str>,
    ) -> Result<RouteCheckOutcome, Box<dyn std::error::Error>> {
        let mut body = json!({
            "namespace": namespace,
            "routeName": route_name,
        });
        if let Some(kind) = route_kind {
            body["routeKind"] = Value::String(kind.to_string());
        }

        let resp = self
            .client
            .post(format!("{}/diagnostics/route-check", self.console_url))
            .json(&body)
            .send()
            .await?;

        decode(resp).await
    }

    /// Trace a hostname and path down to the winning route.
    pub async fn trace(
        &self,
        host: &str,
        path: &str,
        method: Option<&str>,
    ) -> Result<TraceOutcome, Box<dyn std::error::Error>> {
        let mut body = json!({
            "host": host,
            "path": path,
        });
        if let Some(method) = method {
            body["method"] = Value::String(method.to_string());
        }

        let resp = self
            .client
            .post(format!("{}/diagnostics/trace", self.console_url))
            .json(&body)
            .send()
            .await?;

        decode(resp).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Box<dyn std::error::Error>> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(format!("Console returned error status {}: {}", status, text).into());
    }

    Ok(serde_json::from_str(&text)?)
}
