//! Router core - turns a method and path into a controller/action pair.

use http::Method;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::cache;
use super::collector::Routes;
use super::error::{RouteDefinitionError, RoutingError};
use super::mapped::{self, DefaultRoute, MappedRouteParser, MappedTarget, MAP_ROUTE_HANDLER};
use super::request::{normalize_path, InvocationMode, Request};
use super::table::{Lookup, RouteSpec, RouteTable};

/// Root namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "App";

/// Route matches slower than this are logged at warn level
const SLOW_MATCH_THRESHOLD: Duration = Duration::from_millis(1);

/// Result of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Fully-qualified controller name, e.g. `App\Controllers\Users`
    pub controller_name: String,
    pub action_name: String,
    /// Placeholder values, or the parsed `paths` pairs for mapped routes
    pub path_vars: HashMap<String, String>,
}

impl RouteMatch {
    #[inline]
    #[must_use]
    pub fn get_path_var(&self, name: &str) -> Option<&str> {
        self.path_vars.get(name).map(String::as_str)
    }
}

/// Answers whether a fully-qualified controller name exists.
pub trait ControllerIndex {
    fn has_controller(&self, name: &str) -> bool;
}

impl ControllerIndex for HashSet<String> {
    fn has_controller(&self, name: &str) -> bool {
        self.contains(name)
    }
}

/// Resolves requests against an immutable [`RouteTable`].
///
/// Cheap to share: every field is read-only after [`RouterBuilder::build`].
#[derive(Clone)]
pub struct Router {
    table: RouteTable,
    mapped_parser: Option<MappedRouteParser>,
    namespace: String,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table.len())
            .field("mapped_routes", &self.mapped_parser.is_some())
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl Router {
    #[must_use]
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    /// Wrap an already-built table with the default namespace and no mapped routes.
    #[must_use]
    pub fn from_table(table: RouteTable) -> Self {
        Self {
            table,
            mapped_parser: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    /// Resolve a [`Request`].
    ///
    /// # Errors
    ///
    /// See [`Router::resolve`].
    pub fn resolve_request(
        &self,
        request: &Request,
        controllers: &dyn ControllerIndex,
    ) -> Result<RouteMatch, RoutingError> {
        self.resolve(request.mode, &request.method, &request.path, controllers)
    }

    /// Resolve `method` and `path` to a controller/action pair.
    ///
    /// `path` is normalized (leading slash, no trailing slash) before lookup.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::NotFound`] when nothing matches
    /// - [`RoutingError::MethodNotAllowed`] when the path matches other methods
    /// - [`RoutingError::ControllerMissing`] when the controller is unknown
    /// - [`RoutingError::ActionMissing`] when the handler has no action part
    pub fn resolve(
        &self,
        mode: InvocationMode,
        method: &str,
        path: &str,
        controllers: &dyn ControllerIndex,
    ) -> Result<RouteMatch, RoutingError> {
        let path = normalize_path(path);
        debug!(method = %method, path = %path, "Route match attempt");

        let match_start = Instant::now();
        let lookup = match Method::from_bytes(method.as_bytes()) {
            Ok(method) => self.table.lookup(&method, &path),
            Err(_) => {
                let allowed = self.table.allowed_methods(&path, None);
                if allowed.is_empty() {
                    Lookup::NotFound
                } else {
                    Lookup::MethodNotAllowed(allowed)
                }
            }
        };
        let match_duration = match_start.elapsed();

        let (handler, vars) = match lookup {
            Lookup::Found { handler, vars } => (handler, vars),
            Lookup::NotFound => {
                warn!(
                    method = %method,
                    path = %path,
                    duration_us = match_duration.as_micros(),
                    "No route matched"
                );
                return Err(RoutingError::NotFound);
            }
            Lookup::MethodNotAllowed(allowed) => {
                warn!(
                    method = %method,
                    path = %path,
                    allowed = ?allowed,
                    "Method not allowed for matched path"
                );
                return Err(RoutingError::MethodNotAllowed(allowed));
            }
        };

        let target = if handler == MAP_ROUTE_HANDLER {
            let Some(parser) = &self.mapped_parser else {
                warn!(path = %path, "Mapped route matched but mapped routing is disabled");
                return Err(RoutingError::NotFound);
            };
            parser(&vars)
        } else {
            let (controller, action) = handler.split_once('@').unwrap_or((handler.as_str(), ""));
            MappedTarget {
                controller: controller.to_string(),
                action: action.to_string(),
                args: vars,
            }
        };

        let controller_name = self.qualify(mode, &target.controller);
        if !controllers.has_controller(&controller_name) {
            warn!(controller = %controller_name, "Controller not registered");
            return Err(RoutingError::ControllerMissing(controller_name));
        }
        if target.action.is_empty() {
            warn!(controller = %controller_name, handler = %handler, "Handler has no action");
            return Err(RoutingError::ActionMissing);
        }

        if match_duration > SLOW_MATCH_THRESHOLD {
            warn!(
                method = %method,
                path = %path,
                controller = %controller_name,
                action = %target.action,
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        } else {
            info!(
                method = %method,
                path = %path,
                controller = %controller_name,
                action = %target.action,
                path_vars = ?target.args,
                duration_us = match_duration.as_micros(),
                "Route matched"
            );
        }

        Ok(RouteMatch {
            controller_name,
            action_name: target.action,
            path_vars: target.args,
        })
    }

    /// `<Root>\Controllers\<name>` over HTTP, `<Root>\Commands\<name>` from the CLI.
    #[must_use]
    pub fn qualify(&self, mode: InvocationMode, controller: &str) -> String {
        format!(
            "{}\\{}\\{}",
            self.namespace,
            mode.namespace_segment(),
            controller
        )
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Registered routes in registration order
    #[must_use]
    pub fn routes(&self) -> &[RouteSpec] {
        self.table.routes()
    }

    /// Print all registered routes to stdout
    pub fn dump_routes(&self) {
        println!(
            "[routes] namespace={} count={}",
            self.namespace,
            self.table.len()
        );
        for route in self.table.routes() {
            println!("[route] {} {} -> {}", route.method, route.pattern, route.handler);
        }
    }
}

/// Configures and builds a [`Router`].
#[derive(Default)]
pub struct RouterBuilder {
    namespace: Option<String>,
    mapped_parser: Option<MappedRouteParser>,
    cache_file: Option<PathBuf>,
}

impl RouterBuilder {
    /// Root namespace, `App` by default
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Enable the mapped-route convention with the given defaults.
    #[must_use]
    pub fn mapped_routes(mut self, defaults: DefaultRoute) -> Self {
        self.mapped_parser = Some(mapped::parser(defaults));
        self
    }

    /// Enable mapped routes with a custom parser.
    #[must_use]
    pub fn mapped_route_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&HashMap<String, String>) -> MappedTarget + Send + Sync + 'static,
    {
        self.mapped_parser = Some(std::sync::Arc::new(parser));
        self
    }

    /// Persist the route table to `path` and reuse it on later builds.
    #[must_use]
    pub fn cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_file = Some(path.into());
        self
    }

    /// Run `define` (or load the cache) and build the router.
    ///
    /// # Errors
    ///
    /// Any [`RouteDefinitionError`] raised by `define` or by the cache.
    pub fn build<F>(self, define: F) -> Result<Router, RouteDefinitionError>
    where
        F: FnOnce(&mut Routes) -> Result<(), RouteDefinitionError>,
    {
        let collect = || {
            let mut routes = Routes::new();
            define(&mut routes)?;
            Ok(routes.into_table())
        };

        let table = match &self.cache_file {
            Some(path) => cache::load_or_build(path, collect)?,
            None => collect()?,
        };

        let namespace = self
            .namespace
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let routes_summary: Vec<String> = table
            .routes()
            .iter()
            .take(10)
            .map(|r| format!("{} {}", r.method, r.pattern))
            .collect();
        info!(
            routes_count = table.len(),
            namespace = %namespace,
            mapped_routes = self.mapped_parser.is_some(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );

        Ok(Router {
            table,
            mapped_parser: self.mapped_parser,
            namespace,
        })
    }
}
