//! Dispatcher core - one request from resolution to response.

use anyhow::Context;
use serde_json::Value;
use std::cell::Cell;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::error::DispatchError;
use crate::app::Application;
use crate::config::AppConfig;
use crate::controller::ControllerRegistry;
use crate::middleware::{MiddlewareRegistry, MiddlewareSpec, Pipeline};
use crate::response::Response;
use crate::router::{InvocationMode, Request, RouteDefinitionError, RouteMatch, Router, RoutingError};

/// Middleware registry specialised for dispatching
pub type AppMiddlewareRegistry = MiddlewareRegistry<Application, Response, DispatchError>;

/// Owns everything immutable about request handling.
///
/// Build once at startup and share (e.g. behind an `Arc`); `dispatch` takes
/// `&self` and keeps all per-request state in the [`Application`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: Arc<AppConfig>,
    config_value: Arc<Value>,
    router: Router,
    controllers: ControllerRegistry,
    middleware: AppMiddlewareRegistry,
    global_middleware: Vec<MiddlewareSpec>,
}

impl Dispatcher {
    /// Global middleware is taken from `config.middleware`. The config is
    /// rendered once here for `Application::config` lookups.
    ///
    /// # Errors
    ///
    /// Fails when the config cannot be rendered as JSON.
    pub fn new(
        config: Arc<AppConfig>,
        router: Router,
        controllers: ControllerRegistry,
        middleware: AppMiddlewareRegistry,
    ) -> anyhow::Result<Self> {
        let config_value = Arc::new(config.to_value()?);
        let global_middleware = config
            .middleware
            .iter()
            .map(|spec| MiddlewareSpec::parse(spec))
            .collect();
        Ok(Self {
            config,
            config_value,
            router,
            controllers,
            middleware,
            global_middleware,
        })
    }

    /// Build the router from `config` (namespace, mapped-route defaults and
    /// route cache) and wrap it in a dispatcher.
    ///
    /// # Errors
    ///
    /// Route definition and route cache failures, and configs that cannot
    /// be rendered.
    pub fn from_config<F>(
        config: AppConfig,
        controllers: ControllerRegistry,
        middleware: AppMiddlewareRegistry,
        define: F,
    ) -> anyhow::Result<Self>
    where
        F: FnOnce(&mut crate::router::Routes) -> Result<(), RouteDefinitionError>,
    {
        let mut builder = Router::builder()
            .namespace(config.namespace.clone())
            .mapped_routes(config.default_route.clone());
        if let Some(path) = &config.route_cache {
            builder = builder.cache_file(path.clone());
        }
        let router = builder.build(define).context("Failed to build routes")?;
        Self::new(Arc::new(config), router, controllers, middleware)
    }

    /// Append a global middleware spec (HTTP requests only).
    pub fn add_middleware(&mut self, spec: &str) {
        self.global_middleware.push(MiddlewareSpec::parse(spec));
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    #[must_use]
    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    /// Fresh application context for `request`
    #[must_use]
    pub fn application(&self, request: &Request) -> Application {
        Application::with_config_value(
            Arc::clone(&self.config),
            Arc::clone(&self.config_value),
            request,
        )
    }

    /// Dispatch `request` with a fresh [`Application`].
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::dispatch`].
    pub fn handle(&self, request: &Request) -> Result<Response, DispatchError> {
        let mut app = self.application(request);
        self.dispatch(&mut app, request)
    }

    /// Resolve `request`, then run global and controller middleware around
    /// the controller action with `app` as payload.
    ///
    /// # Errors
    ///
    /// Routing failures, unknown middleware, undefined actions, invalid
    /// response content, and whatever middleware or the action fail with.
    pub fn dispatch(&self, app: &mut Application, request: &Request) -> Result<Response, DispatchError> {
        let request_id = app.request_id();
        let start = Instant::now();

        let route = self
            .router
            .resolve_request(request, &self.controllers)
            .inspect_err(|err| {
                warn!(
                    request_id = %request_id,
                    method = %request.method,
                    path = %request.path,
                    status = err.status_code(),
                    error = %err,
                    "Request could not be routed"
                );
            })?;

        let specs = self.middleware_for(request.mode, &route);
        debug!(
            request_id = %request_id,
            controller = %route.controller_name,
            action = %route.action_name,
            middleware_count = specs.len(),
            "Middleware chain assembled"
        );
        app.set_route(route.clone());

        let reached = Cell::new(false);
        let chain = Pipeline::new(&self.middleware)
            .through_specs(specs)
            .build(|app: &mut Application| {
                reached.set(true);
                self.execute(&route, app)
            });
        let result = chain.run(app);
        if !reached.get() {
            debug!(
                request_id = %request_id,
                controller = %route.controller_name,
                action = %route.action_name,
                "Middleware short-circuited the request"
            );
        }

        let duration_us = start.elapsed().as_micros();
        match &result {
            Ok(_) => info!(
                request_id = %request_id,
                controller = %route.controller_name,
                action = %route.action_name,
                duration_us,
                "Request dispatched"
            ),
            Err(err) => warn!(
                request_id = %request_id,
                controller = %route.controller_name,
                action = %route.action_name,
                status = err.status_code(),
                error = %err,
                duration_us,
                "Request failed"
            ),
        }
        result
    }

    /// Global middleware (HTTP only) followed by the controller's own.
    #[must_use]
    pub fn middleware_for(&self, mode: InvocationMode, route: &RouteMatch) -> Vec<MiddlewareSpec> {
        let declared = self
            .controllers
            .middleware(&route.controller_name, &route.action_name);
        let global: &[MiddlewareSpec] = match mode {
            InvocationMode::Http => &self.global_middleware,
            InvocationMode::Cli => &[],
        };
        global
            .iter()
            .cloned()
            .chain(declared.iter().map(|spec| MiddlewareSpec::parse(spec)))
            .collect()
    }

    // Terminal of every chain.
    fn execute(&self, route: &RouteMatch, app: &mut Application) -> Result<Response, DispatchError> {
        let mut controller = self
            .controllers
            .instantiate(&route.controller_name, app)
            .ok_or_else(|| RoutingError::ControllerMissing(route.controller_name.clone()))?;

        debug!(
            request_id = %app.request_id(),
            controller = %route.controller_name,
            action = %route.action_name,
            "Invoking controller action"
        );
        let output = controller
            .invoke(&route.action_name, app)
            .map_err(|err| DispatchError::from_action(err, &route.controller_name))?;
        Ok(Response::new(output)?)
    }
}
