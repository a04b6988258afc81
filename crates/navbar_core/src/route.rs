//! Router paths and active-link matching.
//!
//! Matching is exact string equality. Nested routes, trailing slashes and
//! query strings are deliberately not normalized.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A router path as reported by the host router.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(String);

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Route {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Route {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns `true` iff `current` and `target` are the same path string.
pub fn is_active(current: &str, target: &str) -> bool {
    current == target
}

/// Last route value seen by a mounted navbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTracker {
    current: Route,
}

impl RouteTracker {
    pub fn new(initial: Route) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Stores `route`; returns `true` only when it differs from the last one.
    pub fn observe(&mut self, route: Route) -> bool {
        if route == self.current {
            return false;
        }
        self.current = route;
        true
    }
}
