//! Rule matching logic.
//!
//! # Responsibilities
//! - Evaluate one match predicate against a synthetic request
//! - Evaluate one rule (OR across its predicates) with a diagnostic reason
//! - Combine path/method/header/query conditions with AND semantics
//!
//! # Design Decisions
//! - Header names are case-insensitive, header values case-sensitive
//! - Prefix matching is path-segment aware: "/api" matches "/api/users" but
//!   never "/apikey"
//! - Regex values are anchored and must cover the whole path
//! - An invalid regex simply fails to match; the matcher never raises
//! - Pure functions, no I/O: identical inputs always produce identical output

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cluster::model::{
    HeaderMatch, PathMatch, PathMatchKind, QueryParamMatch, RouteMatch, RouteRule,
};

/// A hypothetical request to evaluate rules against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedRequest {
    /// HTTP method, defaulting to GET.
    #[serde(default = "default_method")]
    pub method: String,

    /// Request path. May carry a query string after `?`.
    pub path: String,

    /// Request headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl SimulatedRequest {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            headers: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Path component without the query string.
    pub fn path_only(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }

    /// Query parameters parsed from the `?` suffix of the path.
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        match self.path.split_once('?') {
            Some((_, query)) => query
                .split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Outcome of evaluating one rule: whether it matched and a human-readable
/// reason for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub matched: bool,
    pub reason: String,
}

/// Evaluate a path predicate against the request path (query excluded).
pub fn match_path(path_match: &PathMatch, request_path: &str) -> bool {
    match path_match.kind {
        PathMatchKind::Exact => request_path == path_match.value,
        PathMatchKind::Prefix => {
            // "/" is a prefix of every path. Otherwise the match must end on
            // a segment boundary so "/api" never claims "/apikey".
            if path_match.value == "/" {
                return true;
            }
            let value = path_match.value.trim_end_matches('/');
            match request_path.strip_prefix(value) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            }
        }
        PathMatchKind::Regex => match Regex::new(&format!("^(?:{})$", path_match.value)) {
            Ok(re) => re.is_match(request_path),
            Err(_) => false,
        },
    }
}

/// Evaluate a method predicate. An absent expectation always holds.
pub fn match_method(expected: Option<&str>, actual: &str) -> bool {
    match expected {
        Some(method) => method == actual,
        None => true,
    }
}

/// Every expected header must be present with an equal value. An empty
/// expectation set holds vacuously.
pub fn match_headers(expected: &[HeaderMatch], request: &SimulatedRequest) -> bool {
    expected
        .iter()
        .all(|h| request.header(&h.name) == Some(h.value.as_str()))
}

/// Every expected query parameter must be present with an equal value.
pub fn match_query_params(expected: &[QueryParamMatch], request: &SimulatedRequest) -> bool {
    let pairs = request.query_pairs();
    expected
        .iter()
        .all(|p| pairs.iter().any(|(name, value)| *name == p.name && *value == p.value))
}

/// AND of all present fields on one predicate.
pub fn match_predicate(predicate: &RouteMatch, request: &SimulatedRequest) -> bool {
    predicate_failure(predicate, request).is_none()
}

/// First failing field of a predicate, as a diagnostic message, or `None` if
/// every present field holds.
fn predicate_failure(predicate: &RouteMatch, request: &SimulatedRequest) -> Option<String> {
    if let Some(path) = &predicate.path {
        if !match_path(path, request.path_only()) {
            return Some(format!(
                "path mismatch: {:?} {} does not match {}",
                path.kind,
                path.value,
                request.path_only()
            ));
        }
    }

    if let Some(method) = &predicate.method {
        if !match_method(Some(method), &request.method) {
            return Some(format!(
                "method mismatch: expected {}, got {}",
                method, request.method
            ));
        }
    }

    for header in &predicate.headers {
        match request.header(&header.name) {
            None => return Some(format!("missing header {:?}", header.name)),
            Some(value) if value != header.value => {
                return Some(format!(
                    "header {:?} mismatch: expected {:?}, got {:?}",
                    header.name, header.value, value
                ));
            }
            Some(_) => {}
        }
    }

    for param in &predicate.query_params {
        let pairs = request.query_pairs();
        match pairs.iter().find(|(name, _)| *name == param.name) {
            None => return Some(format!("missing query param {:?}", param.name)),
            Some((_, value)) if *value != param.value => {
                return Some(format!(
                    "query param {:?} mismatch: expected {:?}, got {:?}",
                    param.name, param.value, value
                ));
            }
            Some(_) => {}
        }
    }

    None
}

/// Evaluate one rule: OR across its predicates, catch-all when it has none.
///
/// The reason carries the first failing field of the first predicate on
/// failure, so the per-rule trace explains why traffic fell through.
pub fn match_rule(rule: &RouteRule, request: &SimulatedRequest) -> RuleOutcome {
    if rule.matches.is_empty() {
        return RuleOutcome {
            matched: true,
            reason: "catch-all rule".to_string(),
        };
    }

    let mut first_failure = None;
    for (i, predicate) in rule.matches.iter().enumerate() {
        match predicate_failure(predicate, request) {
            None => {
                return RuleOutcome {
                    matched: true,
                    reason: format!("matched predicate {i}"),
                };
            }
            Some(reason) => {
                if first_failure.is_none() {
                    first_failure = Some(reason);
                }
            }
        }
    }

    RuleOutcome {
        matched: false,
        // At least one predicate exists, so a failure was recorded.
        reason: first_failure.unwrap_or_else(|| "no predicate matched".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(kind: PathMatchKind, value: &str) -> PathMatch {
        PathMatch {
            kind,
            value: value.to_string(),
        }
    }

    #[test]
    fn exact_path_is_string_equality() {
        let m = path(PathMatchKind::Exact, "/health");
        assert!(match_path(&m, "/health"));
        assert!(!match_path(&m, "/health/"));
        assert!(!match_path(&m, "/healthz"));
    }

    #[test]
    fn prefix_respects_segment_boundaries() {
        let m = path(PathMatchKind::Prefix, "/api");
        assert!(match_path(&m, "/api"));
        assert!(match_path(&m, "/api/users"));
        assert!(match_path(&m, "/api/"));
        assert!(!match_path(&m, "/apikey"));
        assert!(!match_path(&m, "/ap"));
    }

    #[test]
    fn root_prefix_matches_everything() {
        let m = path(PathMatchKind::Prefix, "/");
        assert!(match_path(&m, "/"));
        assert!(match_path(&m, "/anything/at/all"));
    }

    #[test]
    fn trailing_slash_prefix_still_segment_aware() {
        let m = path(PathMatchKind::Prefix, "/api/");
        assert!(match_path(&m, "/api"));
        assert!(match_path(&m, "/api/users"));
        assert!(!match_path(&m, "/apikey"));
    }

    #[test]
    fn regex_must_cover_whole_path() {
        let m = path(PathMatchKind::Regex, r"/users/\d+");
        assert!(match_path(&m, "/users/42"));
        assert!(!match_path(&m, "/users/42/orders"));
        assert!(!match_path(&m, "/v1/users/42"));
    }

    #[test]
    fn already_anchored_regex_is_fine() {
        let m = path(PathMatchKind::Regex, r"^/users/\d+$");
        assert!(match_path(&m, "/users/42"));
        assert!(!match_path(&m, "/users/abc"));
    }

    #[test]
    fn invalid_regex_never_matches() {
        let m = path(PathMatchKind::Regex, r"/users/(\d+");
        assert!(!match_path(&m, "/users/42"));
    }

    #[test]
    fn method_absent_always_holds() {
        assert!(match_method(None, "DELETE"));
        assert!(match_method(Some("GET"), "GET"));
        assert!(!match_method(Some("GET"), "POST"));
        // Case-sensitive by design.
        assert!(!match_method(Some("GET"), "get"));
    }

    #[test]
    fn header_names_case_insensitive_values_case_sensitive() {
        let request = SimulatedRequest::new("GET", "/").with_header("X-Version", "v2");
        let expected = vec![HeaderMatch {
            name: "x-version".into(),
            value: "v2".into(),
        }];
        assert!(match_headers(&expected, &request));

        let wrong_value = vec![HeaderMatch {
            name: "X-Version".into(),
            value: "V2".into(),
        }];
        assert!(!match_headers(&wrong_value, &request));
    }

    #[test]
    fn query_params_parsed_from_path() {
        let request = SimulatedRequest::new("GET", "/search?q=rust&page=2");
        assert_eq!(request.path_only(), "/search");

        let expected = vec![QueryParamMatch {
            name: "q".into(),
            value: "rust".into(),
        }];
        assert!(match_query_params(&expected, &request));

        let missing = vec![QueryParamMatch {
            name: "sort".into(),
            value: "asc".into(),
        }];
        assert!(!match_query_params(&missing, &request));
    }

    #[test]
    fn predicate_ands_all_present_fields() {
        let predicate = RouteMatch {
            path: Some(path(PathMatchKind::Prefix, "/api")),
            method: Some("GET".into()),
            headers: vec![HeaderMatch {
                name: "X-Version".into(),
                value: "v2".into(),
            }],
            query_params: vec![],
        };

        let ok = SimulatedRequest::new("GET", "/api/users").with_header("X-Version", "v2");
        assert!(match_predicate(&predicate, &ok));

        let wrong_method =
            SimulatedRequest::new("POST", "/api/users").with_header("X-Version", "v2");
        assert!(!match_predicate(&predicate, &wrong_method));

        let no_header = SimulatedRequest::new("GET", "/api/users");
        assert!(!match_predicate(&predicate, &no_header));
    }

    #[test]
    fn empty_rule_is_catch_all() {
        let rule = RouteRule::default();
        let outcome = match_rule(&rule, &SimulatedRequest::new("DELETE", "/anything"));
        assert!(outcome.matched);
        assert_eq!(outcome.reason, "catch-all rule");
    }

    #[test]
    fn rule_ors_across_predicates() {
        let rule = RouteRule {
            matches: vec![
                RouteMatch {
                    path: Some(path(PathMatchKind::Exact, "/a")),
                    ..RouteMatch::default()
                },
                RouteMatch {
                    path: Some(path(PathMatchKind::Exact, "/b")),
                    ..RouteMatch::default()
                },
            ],
            backend_refs: vec![],
        };

        let outcome = match_rule(&rule, &SimulatedRequest::new("GET", "/b"));
        assert!(outcome.matched);
        assert_eq!(outcome.reason, "matched predicate 1");

        let outcome = match_rule(&rule, &SimulatedRequest::new("GET", "/c"));
        assert!(!outcome.matched);
        assert!(outcome.reason.contains("path mismatch"));
    }

    #[test]
    fn failure_reason_names_first_failing_field() {
        let rule = RouteRule {
            matches: vec![RouteMatch {
                path: Some(path(PathMatchKind::Prefix, "/api")),
                method: Some("GET".into()),
                headers: vec![HeaderMatch {
                    name: "X-Version".into(),
                    value: "v2".into(),
                }],
                query_params: vec![],
            }],
            backend_refs: vec![],
        };

        let wrong_method =
            SimulatedRequest::new("POST", "/api/users").with_header("X-Version", "v2");
        let outcome = match_rule(&rule, &wrong_method);
        assert_eq!(outcome.reason, "method mismatch: expected GET, got POST");

        let missing_header = SimulatedRequest::new("GET", "/api/users");
        let outcome = match_rule(&rule, &missing_header);
        assert_eq!(outcome.reason, "missing header \"X-Version\"");
    }
}
