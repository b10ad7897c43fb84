//! Error kinds raised while building or querying the router.
//!
//! Registration errors (`DuplicateRoute`, `InvalidDeclaration`) abort startup.
//! The remaining kinds are returned to the transport layer per request, which
//! picks the user-visible status via [`RouterError::status_code`].

use http::StatusCode;
use thiserror::Error;

use crate::declaration::HttpVerb;

/// Boxed cause of an instantiation failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum RouterError {
    /// The same normalized full path (or path + verb) was registered twice.
    #[error("route `{path}` is already registered{}", verb_suffix(.verb))]
    DuplicateRoute {
        path: String,
        verb: Option<HttpVerb>,
    },

    /// An operation declaration is missing metadata or its result type lacks
    /// the respondable capability.
    #[error("invalid declaration {controller}::{operation}: {reason}")]
    InvalidDeclaration {
        controller: String,
        operation: String,
        reason: String,
    },

    /// The controller type could not be default-constructed.
    #[error("controller {controller} could not be instantiated: {source}")]
    InstantiationFailure {
        controller: String,
        #[source]
        source: BoxError,
    },

    /// No trie node reached by the path carries a routing entry.
    #[error("no route matches `{path}`")]
    RouteNotFound { path: String },

    /// The path matched a route that does not accept the verb.
    #[error("route `{path}` does not accept {verb}")]
    VerbNotAllowed {
        path: String,
        verb: String,
        allowed: Vec<HttpVerb>,
    },

    /// The leftover segments do not fit the operation's URL parameters.
    #[error("cannot resolve `{path}`: operation expects {expected} url parameter(s), found {actual}")]
    UnresolvableUrl {
        path: String,
        expected: usize,
        actual: usize,
    },
}

fn verb_suffix(verb: &Option<HttpVerb>) -> String {
    verb.map(|v| format!(" for {v}")).unwrap_or_default()
}

impl RouterError {
    /// HTTP status a transport layer should answer with for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            RouterError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            RouterError::VerbNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            RouterError::UnresolvableUrl { .. } => StatusCode::BAD_REQUEST,
            RouterError::DuplicateRoute { .. }
            | RouterError::InvalidDeclaration { .. }
            | RouterError::InstantiationFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for errors that can only happen while the routing table is built.
    #[must_use]
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            RouterError::DuplicateRoute { .. } | RouterError::InvalidDeclaration { .. }
        )
    }

    /// Short, stable name of the error kind (used in logs and problem bodies).
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RouterError::DuplicateRoute { .. } => "duplicate_route",
            RouterError::InvalidDeclaration { .. } => "invalid_declaration",
            RouterError::InstantiationFailure { .. } => "instantiation_failure",
            RouterError::RouteNotFound { .. } => "route_not_found",
            RouterError::VerbNotAllowed { .. } => "verb_not_allowed",
            RouterError::UnresolvableUrl { .. } => "unresolvable_url",
        }
    }

    pub(crate) fn invalid(controller: &str, operation: &str, reason: impl Into<String>) -> Self {
        RouterError::InvalidDeclaration {
            controller: controller.to_string(),
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = RouterError::RouteNotFound {
            path: "ghost/x".into(),
        };
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let verb = RouterError::VerbNotAllowed {
            path: "user/list".into(),
            verb: "POST".into(),
            allowed: vec![HttpVerb::Get],
        };
        assert_eq!(verb.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(!verb.is_registration_error());

        let dup = RouterError::DuplicateRoute {
            path: "user/list".into(),
            verb: Some(HttpVerb::Get),
        };
        assert!(dup.is_registration_error());
        assert_eq!(dup.to_string(), "route `user/list` is already registered for GET");
    }

    #[test]
    fn test_duplicate_without_verb_display() {
        let dup = RouterError::DuplicateRoute {
            path: "a/b".into(),
            verb: None,
        };
        assert_eq!(dup.to_string(), "route `a/b` is already registered");
        assert_eq!(dup.kind(), "duplicate_route");
    }
}
