//! Per-request application context.
//!
//! An [`Application`] is the payload threaded through the middleware chain
//! and handed to controllers. It is built fresh for each request and owns
//! everything request-scoped: the resolved route, the request headers and
//! free-form attributes middleware may attach.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::warn;
use ulid::Ulid;

use crate::config::{self, AppConfig};
use crate::router::{HeaderVec, InvocationMode, Request, RouteMatch};

/// Header carrying a caller-supplied request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ULID naming one dispatch in every log line it produces.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct RequestId(Ulid);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Id for `request`: its `x-request-id` header when that holds a ULID,
    /// so a caller can correlate its own logs, otherwise a fresh one.
    #[must_use]
    pub fn for_request(request: &Request) -> Self {
        request
            .header(REQUEST_ID_HEADER)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or_default()
    }

    /// When the id was minted (or claimed to be, for caller-supplied ids)
    #[must_use]
    pub fn minted_at(&self) -> SystemTime {
        self.0.datetime()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RequestId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s).map(Self)
    }
}

#[derive(Debug, Clone)]
pub struct Application {
    config: Arc<AppConfig>,
    config_value: Arc<Value>,
    mode: InvocationMode,
    request_id: RequestId,
    method: String,
    path: String,
    headers: HeaderVec,
    route: Option<RouteMatch>,
    attributes: HashMap<String, String>,
}

impl Application {
    /// Context for `request`, reusing a valid `x-request-id` header if present.
    ///
    /// A config that cannot be rendered is logged and leaves
    /// [`Application::config`] empty; `Dispatcher::new` rejects such configs
    /// up front.
    #[must_use]
    pub fn new(config: Arc<AppConfig>, request: &Request) -> Self {
        let config_value = config.to_value().unwrap_or_else(|err| {
            warn!(error = %format!("{err:#}"), "Config lookups disabled for this request");
            Value::Null
        });
        Self::with_config_value(config, Arc::new(config_value), request)
    }

    /// Context sharing a config already rendered by the dispatcher
    pub(crate) fn with_config_value(
        config: Arc<AppConfig>,
        config_value: Arc<Value>,
        request: &Request,
    ) -> Self {
        Self {
            config,
            config_value,
            mode: request.mode,
            request_id: RequestId::for_request(request),
            method: request.method.clone(),
            path: request.path.clone(),
            headers: request.headers.clone(),
            route: None,
            attributes: HashMap::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> InvocationMode {
        self.mode
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request header by name (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn settings(&self) -> &AppConfig {
        &self.config
    }

    /// Dotted configuration lookup, e.g. `config("default_route.module")`.
    #[must_use]
    pub fn config(&self, key: &str) -> Option<&Value> {
        config::lookup(&self.config_value, key)
    }

    #[must_use]
    pub fn route(&self) -> Option<&RouteMatch> {
        self.route.as_ref()
    }

    pub(crate) fn set_route(&mut self, route: RouteMatch) {
        self.route = Some(route);
    }

    /// Route variable resolved for this request: a placeholder value or a
    /// `key/value` pair from a mapped route's tail.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.route.as_ref().and_then(|r| r.get_path_var(key))
    }

    /// All route variables
    #[must_use]
    pub fn attrs(&self) -> Option<&HashMap<String, String>> {
        self.route.as_ref().map(|r| &r.path_vars)
    }

    /// Value attached by middleware for later layers or the controller
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }
}
