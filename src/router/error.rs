use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

/// Expected dispatch failures produced by route resolution.
///
/// Every variant maps to a transport status through [`RoutingError::status_code`]
/// without further failure, so callers never need to inspect the message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// No registered route matches the path.
    #[error("not found")]
    NotFound,
    /// The path matches, but not for the requested method.
    ///
    /// The allowed set is kept even though the dispatcher only reports the status.
    #[error("method not allowed (allowed: {})", join_methods(.0))]
    MethodNotAllowed(BTreeSet<String>),
    /// The handler resolved to a controller but the action part is empty.
    #[error("action not found")]
    ActionMissing,
    /// The fully-qualified controller name is not registered.
    #[error("controller: {0} not found")]
    ControllerMissing(String),
}

impl RoutingError {
    /// Transport status for this failure: 405 for a method mismatch, 404 otherwise.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            RoutingError::MethodNotAllowed(_) => 405,
            RoutingError::NotFound
            | RoutingError::ActionMissing
            | RoutingError::ControllerMissing(_) => 404,
        }
    }

    /// Methods accepted for the path, when the failure is a method mismatch
    #[must_use]
    pub fn allowed_methods(&self) -> Option<&BTreeSet<String>> {
        match self {
            RoutingError::MethodNotAllowed(allowed) => Some(allowed),
            _ => None,
        }
    }
}

fn join_methods(methods: &BTreeSet<String>) -> String {
    methods.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Errors raised while registering routes or loading the route cache.
#[derive(Debug, Error)]
pub enum RouteDefinitionError {
    #[error("route pattern is empty; use `/` for the root")]
    EmptyPattern,
    #[error("number of opening '[' and closing ']' does not match in route `{0}`")]
    UnbalancedBrackets(String),
    #[error("optional segments can only occur at the end of a route: `{0}`")]
    OptionalNotAtEnd(String),
    #[error("empty optional part in route `{0}`")]
    EmptyOptional(String),
    #[error("invalid placeholder `{placeholder}` in route `{route}`")]
    InvalidPlaceholder { route: String, placeholder: String },
    #[error("cannot use the same placeholder `{name}` twice in route `{route}`")]
    DuplicatePlaceholder { route: String, name: String },
    #[error("regex `{regex}` for parameter `{name}` is invalid")]
    InvalidRegex {
        name: String,
        regex: String,
        #[source]
        source: regex::Error,
    },
    #[error("regex `{regex}` for parameter `{name}` contains a capturing group")]
    CapturingGroup { name: String, regex: String },
    #[error("cannot register two routes matching `{route}` for method `{method}`")]
    DuplicateRoute { method: String, route: String },
    #[error("static route `{route}` is shadowed by previously defined variable route `{shadowed_by}` for method `{method}`")]
    ShadowedStaticRoute {
        method: String,
        route: String,
        shadowed_by: String,
    },
    #[error("invalid HTTP method `{0}`")]
    InvalidMethod(String),
    #[error("route cache directory for `{}` must be writable", .0.display())]
    CacheNotWritable(PathBuf),
    #[error("route cache I/O failed for `{}`", .path.display())]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("route cache `{}` is malformed", .path.display())]
    CacheFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
