//! Route table
//!
//! Maps (HTTP method, raw query-string selector) to a controller target.
//! Filled once at startup, read-only while serving.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::logger;

/// Methods a route can be registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Parse a method name, case-insensitively
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Registration-time normalization: unknown verbs become GET
    pub fn normalize(method: &str) -> Self {
        Self::parse(method).unwrap_or(Self::Get)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Controller type + action a route points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    pub controller: String,
    pub action: String,
}

impl RouteTarget {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
        }
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.controller, self.action)
    }
}

impl FromStr for RouteTarget {
    type Err = String;

    /// Parse `controller@action`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('@') {
            Some((controller, action)) if !controller.is_empty() && !action.is_empty() => {
                Ok(Self::new(controller, action))
            }
            _ => Err(format!("invalid handler '{s}', expected 'controller@action'")),
        }
    }
}

/// (method, selector) -> target
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: HashMap<(HttpMethod, String), RouteTarget>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route; a second registration for the same key replaces the first
    pub fn register(
        &mut self,
        method: &str,
        selector: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) {
        self.insert(
            HttpMethod::normalize(method),
            selector.into(),
            RouteTarget::new(controller, action),
        );
    }

    /// Register a route given as `controller@action`
    pub fn register_str(
        &mut self,
        method: &str,
        selector: impl Into<String>,
        handler: &str,
    ) -> Result<(), String> {
        let target = handler.parse()?;
        self.insert(HttpMethod::normalize(method), selector.into(), target);
        Ok(())
    }

    fn insert(&mut self, method: HttpMethod, selector: String, target: RouteTarget) {
        let new = target.to_string();
        if let Some(old) = self.routes.insert((method, selector.clone()), target) {
            logger::log_route_overwritten(method.as_str(), &selector, &old.to_string(), &new);
        }
    }

    pub fn lookup(&self, method: HttpMethod, selector: &str) -> Option<&RouteTarget> {
        self.routes.get(&(method, selector.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (HttpMethod, &str, &RouteTarget)> {
        self.routes
            .iter()
            .map(|((method, selector), target)| (*method, selector.as_str(), target))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_normalization() {
        assert_eq!(HttpMethod::normalize("post"), HttpMethod::Post);
        assert_eq!(HttpMethod::normalize("Delete"), HttpMethod::Delete);
        assert_eq!(HttpMethod::normalize("patch"), HttpMethod::Get);
        assert_eq!(HttpMethod::normalize(""), HttpMethod::Get);
        assert_eq!(HttpMethod::parse("OPTIONS"), None);
    }

    #[test]
    fn test_register_and_lookup() {
        let mut table = RouteTable::new();
        table.register("post", "word/save", "words", "save");

        let target = table.lookup(HttpMethod::Post, "word/save").unwrap();
        assert_eq!(target, &RouteTarget::new("words", "save"));
        assert!(table.lookup(HttpMethod::Get, "word/save").is_none());
        assert!(table.lookup(HttpMethod::Post, "word/save/").is_none());
    }

    #[test]
    fn test_unknown_method_registers_as_get() {
        let mut table = RouteTable::new();
        table.register("PATCH", "ping", "ping", "pong");
        assert!(table.lookup(HttpMethod::Get, "ping").is_some());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut table = RouteTable::new();
        table.register("GET", "ping", "ping", "pong");
        table.register("get", "ping", "health", "check");

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.lookup(HttpMethod::Get, "ping"),
            Some(&RouteTarget::new("health", "check"))
        );
    }

    #[test]
    fn test_target_parse() {
        let target: RouteTarget = "quick@daily".parse().unwrap();
        assert_eq!(target.controller, "quick");
        assert_eq!(target.action, "daily");
        assert_eq!(target.to_string(), "quick@daily");

        assert!("quick".parse::<RouteTarget>().is_err());
        assert!("@daily".parse::<RouteTarget>().is_err());
        assert!("quick@".parse::<RouteTarget>().is_err());
    }

    #[test]
    fn test_register_str_rejects_malformed() {
        let mut table = RouteTable::new();
        assert!(table.register_str("GET", "x", "nope").is_err());
        assert!(table.is_empty());
        table.register_str("PUT", "x", "a@b").unwrap();
        assert!(table.lookup(HttpMethod::Put, "x").is_some());
    }
}
