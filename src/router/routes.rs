//! Route table for the in-process router.
//!
//! Patterns are `/`-separated segments where `:name` binds a parameter and a
//! trailing `**` matches any remainder. Redirects substitute bound params
//! into the target and keep the original query string and fragment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::snapshot::{RouteSnapshot, RouterStateSnapshot};

const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Cannot match any routes. URL Segment: '{url}'")]
    NoMatch { url: String },

    #[error("Too many redirects ({limit}) while resolving '{url}'")]
    TooManyRedirects { url: String, limit: usize },

    #[error("Invalid route path '{path}': {reason}")]
    InvalidPattern { path: String, reason: String },

    #[error("Redirect '{target}' uses ':{param}' which '{path}' does not bind")]
    UnboundRedirectParam {
        path: String,
        target: String,
        param: String,
    },
}

/// A route definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    /// Guard outcome; `false` cancels the navigation.
    #[serde(default = "default_can_activate")]
    pub can_activate: bool,
    /// When set, the resolver fails with this message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_error: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, Value>,
}

fn default_can_activate() -> bool {
    true
}

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            redirect_to: None,
            can_activate: true,
            resolve_error: None,
            data: BTreeMap::new(),
        }
    }

    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect_to = Some(target.into());
        self
    }

    /// Guard rejects every activation of this route.
    pub fn deny(mut self) -> Self {
        self.can_activate = false;
        self
    }

    pub fn fail_resolve(mut self, message: impl Into<String>) -> Self {
        self.resolve_error = Some(message.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    fn pattern(&self) -> Vec<&str> {
        split_path(&self.path)
    }
}

/// A URL split into path segments, query parameters and fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUrl {
    pub segments: Vec<String>,
    pub query: BTreeMap<String, String>,
    pub fragment: Option<String>,
}

impl ParsedUrl {
    pub fn parse(url: &str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (url, None),
        };
        let (path, query_str) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        let query = query_str
            .map(|q| {
                q.split('&')
                    .filter(|pair| !pair.is_empty())
                    .map(|pair| match pair.split_once('=') {
                        Some((key, value)) => (key.to_string(), value.to_string()),
                        None => (pair.to_string(), String::new()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            segments: split_path(path).into_iter().map(str::to_string).collect(),
            query,
            fragment,
        }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub fn to_url(&self) -> String {
        let mut url = self.path();
        if !self.query.is_empty() {
            let query: Vec<String> = self
                .query
                .iter()
                .map(|(key, value)| {
                    if value.is_empty() {
                        key.clone()
                    } else {
                        format!("{}={}", key, value)
                    }
                })
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }
        if let Some(fragment) = &self.fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Result of matching a URL against the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub route: Route,
    pub url_after_redirects: String,
    pub snapshot: RouterStateSnapshot,
}

/// Ordered route definitions; the first matching route wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Result<Self, RouteError> {
        for route in &routes {
            validate_pattern(route)?;
        }
        Ok(Self { routes })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve redirects and match `url` to a route.
    pub fn recognize(&self, url: &str) -> Result<Recognition, RouteError> {
        let mut parsed = ParsedUrl::parse(url);

        for _ in 0..=MAX_REDIRECTS {
            let (route, params) = self.find(&parsed.segments).ok_or_else(|| RouteError::NoMatch {
                url: parsed.path(),
            })?;

            let Some(target) = &route.redirect_to else {
                return Ok(Recognition {
                    route: route.clone(),
                    url_after_redirects: parsed.to_url(),
                    snapshot: build_snapshot(route, &parsed, params),
                });
            };

            tracing::trace!(from = %parsed.path(), to = %target, "Applying redirect");
            parsed.segments = substitute(route, target, &params)?;
        }

        Err(RouteError::TooManyRedirects {
            url: url.to_string(),
            limit: MAX_REDIRECTS,
        })
    }

    fn find(&self, segments: &[String]) -> Option<(&Route, BTreeMap<String, String>)> {
        self.routes
            .iter()
            .find_map(|route| match_segments(&route.pattern(), segments).map(|params| (route, params)))
    }
}

fn validate_pattern(route: &Route) -> Result<(), RouteError> {
    let pattern = route.pattern();
    for (index, segment) in pattern.iter().enumerate() {
        if *segment == "**" && index + 1 != pattern.len() {
            return Err(RouteError::InvalidPattern {
                path: route.path.clone(),
                reason: "'**' must be the last segment".to_string(),
            });
        }
        if *segment == ":" {
            return Err(RouteError::InvalidPattern {
                path: route.path.clone(),
                reason: "parameter name is empty".to_string(),
            });
        }
    }
    Ok(())
}

fn match_segments(pattern: &[&str], segments: &[String]) -> Option<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    for (index, expected) in pattern.iter().enumerate() {
        if *expected == "**" {
            return Some(params);
        }
        let actual = segments.get(index)?;
        match expected.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), actual.clone());
            }
            None if expected == actual => {}
            None => return None,
        }
    }
    (pattern.len() == segments.len()).then_some(params)
}

fn substitute(
    route: &Route,
    target: &str,
    params: &BTreeMap<String, String>,
) -> Result<Vec<String>, RouteError> {
    split_path(target)
        .into_iter()
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => params.get(name).cloned().ok_or_else(|| RouteError::UnboundRedirectParam {
                path: route.path.clone(),
                target: target.to_string(),
                param: name.to_string(),
            }),
            None => Ok(segment.to_string()),
        })
        .collect()
}

fn build_snapshot(
    route: &Route,
    parsed: &ParsedUrl,
    params: BTreeMap<String, String>,
) -> RouterStateSnapshot {
    let leaf = RouteSnapshot {
        path: route.pattern().join("/"),
        url: parsed.segments.clone(),
        params,
        query_params: parsed.query.clone(),
        fragment: parsed.fragment.clone(),
        data: route.data.clone(),
        children: Vec::new(),
    };
    let root = RouteSnapshot {
        query_params: parsed.query.clone(),
        fragment: parsed.fragment.clone(),
        children: vec![leaf],
        ..Default::default()
    };
    RouterStateSnapshot::new(parsed.to_url(), root)
}
