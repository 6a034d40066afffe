//! Small application used by the `switchyard` binary.

use anyhow::anyhow;
use std::sync::Arc;

use crate::app::Application;
use crate::config::AppConfig;
use crate::controller::{ActionError, Controller, ControllerRegistry};
use crate::dispatcher::Dispatcher;
use crate::middleware;
use crate::response::ActionOutput;
use crate::router::{RouteDefinitionError, Routes, MAP_ROUTE, MAP_ROUTE_HANDLER};

/// Token accepted by the `Auth` middleware on `POST /users/{id}`
pub const DEMO_TOKEN: &str = "demo-token";

/// Routes of the demo application
///
/// # Errors
///
/// Never in practice; the patterns are fixed.
pub fn routes(r: &mut Routes) -> Result<(), RouteDefinitionError> {
    r.add_group("/users", |r| {
        r.get("", "Users@index")?;
        r.get("/{id:\\d+}", "Users@show")?;
        r.post("/{id:\\d+}", "Users@update")?;
        Ok(())
    })?;
    r.get("/cache/clear", "Cache@clear")?;
    r.get("/broken", "Users@")?;
    r.any(MAP_ROUTE, MAP_ROUTE_HANDLER)?;
    Ok(())
}

/// Controllers of the demo application, keyed under `namespace`
#[must_use]
pub fn controllers(namespace: &str) -> ControllerRegistry {
    let mut registry = ControllerRegistry::new();
    registry
        .register::<HomeIndex>(format!("{namespace}\\Controllers\\Home\\Index"))
        .register::<Users>(format!("{namespace}\\Controllers\\Users"))
        .register::<Users>(format!("{namespace}\\Controllers\\Home\\Users"))
        .register::<Help>(format!("{namespace}\\Commands\\Home\\Index"))
        .register::<Cache>(format!("{namespace}\\Commands\\Cache"));
    registry
}

/// Dispatcher wired with the demo routes, controllers and built-in middleware.
///
/// # Errors
///
/// Route cache failures when `config.route_cache` is set, and configs that
/// cannot be rendered.
pub fn dispatcher(config: AppConfig) -> anyhow::Result<Dispatcher> {
    let controllers = controllers(&config.namespace);
    Dispatcher::from_config(config, controllers, middleware::builtin(), routes)
}

/// Demo dispatcher on default configuration
///
/// # Errors
///
/// See [`dispatcher`].
pub fn default_dispatcher() -> anyhow::Result<Arc<Dispatcher>> {
    dispatcher(AppConfig::default()).map(Arc::new)
}

struct HomeIndex;

impl Controller for HomeIndex {
    fn create(_app: &Application) -> Self {
        HomeIndex
    }

    fn invoke(&mut self, action: &str, _app: &mut Application) -> Result<ActionOutput, ActionError> {
        match action {
            "index" => Ok("Welcome to switchyard".into()),
            "about" => Ok("switchyard demo application".into()),
            other => Err(ActionError::Undefined(other.to_string())),
        }
    }
}

struct Users;

impl Controller for Users {
    fn create(_app: &Application) -> Self {
        Users
    }

    fn middleware(action: &str) -> &'static [&'static str] {
        match action {
            "update" => &["Auth:demo-token"],
            _ => &[],
        }
    }

    fn invoke(&mut self, action: &str, app: &mut Application) -> Result<ActionOutput, ActionError> {
        let id = || {
            app.attr("id")
                .map(str::to_string)
                .ok_or_else(|| ActionError::from(anyhow!("missing user id")))
        };
        match action {
            "index" => Ok("users: 1, 2, 3".into()),
            "show" => Ok(format!("user {}", id()?).into()),
            "edit" => Ok(format!("editing user {}", id()?).into()),
            "update" => Ok(format!("updated user {}", id()?).into()),
            "flags" => Ok(serde_json::json!({ "admin": false }).into()),
            other => Err(ActionError::Undefined(other.to_string())),
        }
    }
}

struct Help;

impl Controller for Help {
    fn create(_app: &Application) -> Self {
        Help
    }

    fn invoke(&mut self, action: &str, _app: &mut Application) -> Result<ActionOutput, ActionError> {
        match action {
            "index" => Ok("available commands: cache/clear".into()),
            other => Err(ActionError::Undefined(other.to_string())),
        }
    }
}

struct Cache;

impl Controller for Cache {
    fn create(_app: &Application) -> Self {
        Cache
    }

    fn invoke(&mut self, action: &str, app: &mut Application) -> Result<ActionOutput, ActionError> {
        match action {
            "clear" => {
                let target = app
                    .settings()
                    .route_cache
                    .as_ref()
                    .map_or_else(|| "nothing to clear".to_string(), |p| p.display().to_string());
                Ok(format!("cache cleared: {target}").into())
            }
            other => Err(ActionError::Undefined(other.to_string())),
        }
    }
}
