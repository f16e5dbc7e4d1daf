//! Navigation controller: path → (view, identity) and back.

use serde::Serialize;
use thiserror::Error;

use super::identity::{IdentityField, MalformedIdentity, WorkflowIdentity};
use super::routes::{EntryMatch, RouteTable, ViewSelector, ROUTE_TABLE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("malformed identity: {0}")]
    MalformedIdentity(#[from] MalformedIdentity),

    #[error("no route for {0}")]
    RouteNotFound(String),
}

/// A fully resolved navigation target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub view: ViewSelector,
    pub identity: Option<WorkflowIdentity>,
    /// Normalised request path, used for exact-match highlighting
    pub path: String,
}

impl Resolution {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self {
            view: ViewSelector::NotFound,
            identity: None,
            path: path.into(),
        }
    }
}

/// Strip the query/fragment and a single trailing slash
pub fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}

impl RouteTable {
    /// Strict matching; the error says why nothing matched
    pub fn match_path(
        &self,
        path: &str,
    ) -> Result<(ViewSelector, Option<WorkflowIdentity>), NavigationError> {
        let normalized = normalize_path(path);
        let Some(rest) = normalized.strip_prefix('/') else {
            return Err(NavigationError::RouteNotFound(path.to_string()));
        };

        let raw: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };

        for entry in self.entries() {
            match entry.matches(&raw) {
                EntryMatch::Miss => continue,
                EntryMatch::Hit(identity) => return Ok((entry.view(), identity)),
                // A drill-down shape with bad parameters must not fall through
                // to a shorter route
                EntryMatch::Malformed(e) => return Err(e.into()),
            }
        }

        Err(NavigationError::RouteNotFound(normalized.to_string()))
    }

    /// Total resolution: anything unresolvable becomes the not-found view
    pub fn resolve(&self, path: &str) -> Resolution {
        let normalized = normalize_path(path).to_string();
        match self.match_path(path) {
            Ok((view, identity)) => Resolution {
                view,
                identity,
                path: normalized,
            },
            Err(e) => {
                tracing::debug!("Navigation to {} fell back to not found: {}", path, e);
                Resolution::not_found(normalized)
            }
        }
    }

    /// Canonical URL for a view, the inverse of [`RouteTable::resolve`]
    pub fn link_to(
        &self,
        view: ViewSelector,
        identity: Option<&WorkflowIdentity>,
    ) -> Result<String, NavigationError> {
        let entry = self
            .entry_for(view)
            .ok_or_else(|| NavigationError::RouteNotFound(view.name().to_string()))?;

        entry.build(identity).ok_or(NavigationError::MalformedIdentity(
            MalformedIdentity::Missing(IdentityField::Hostname),
        ))
    }
}

/// Resolve a request path against the standard route table
pub fn resolve(path: &str) -> Resolution {
    ROUTE_TABLE.resolve(path)
}

/// Build the canonical URL for a view using the standard route table
pub fn link_to(
    view: ViewSelector,
    identity: Option<&WorkflowIdentity>,
) -> Result<String, NavigationError> {
    ROUTE_TABLE.link_to(view, identity)
}

/// Link for a view that never needs an identity
pub fn href(view: ViewSelector) -> String {
    link_to(view, None).unwrap_or_else(|e| {
        tracing::warn!("No link for view {}: {}", view.name(), e);
        "/".to_string()
    })
}

/// Link to the stage trace of one execution
pub fn stage_trace_href(identity: &WorkflowIdentity) -> String {
    link_to(ViewSelector::StageTrace, Some(identity)).unwrap_or_else(|e| {
        tracing::warn!("No stage trace link for {}: {}", identity, e);
        "/".to_string()
    })
}
