//! # Application Configuration
//!
//! Settings shared by the router and the dispatcher, loaded from TOML and
//! overridable through environment variables.
//!
//! ```toml
//! debug = true
//! namespace = "Shop"
//! middleware = ["Trace:debug"]
//! route_cache = "var/routes.json"
//!
//! [default_route]
//! module = "home"
//! controller = "index"
//! action = "index"
//! ```
//!
//! ## Environment Variables
//!
//! - `SWITCHYARD_DEBUG`: `true`/`false`
//! - `SWITCHYARD_NAMESPACE`: root namespace for controllers
//! - `SWITCHYARD_ROUTE_CACHE`: path of the route cache file; empty disables it

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::router::{DefaultRoute, DEFAULT_NAMESPACE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub debug: bool,
    /// Root namespace; controllers live under `<namespace>\Controllers`
    pub namespace: String,
    /// Global middleware specs, skipped for command-line invocations
    pub middleware: Vec<String>,
    pub default_route: DefaultRoute,
    pub route_cache: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            namespace: DEFAULT_NAMESPACE.to_string(),
            middleware: Vec::new(),
            default_route: DefaultRoute::default(),
            route_cache: None,
        }
    }
}

impl AppConfig {
    /// Parse a TOML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid TOML for this shape.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config.with_env_overrides())
    }

    /// # Errors
    ///
    /// Invalid TOML or unexpected field types.
    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Defaults with environment overrides applied
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = env::var("SWITCHYARD_DEBUG") {
            self.debug = matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Ok(val) = env::var("SWITCHYARD_NAMESPACE") {
            if !val.trim().is_empty() {
                self.namespace = val.trim().to_string();
            }
        }
        if let Ok(val) = env::var("SWITCHYARD_ROUTE_CACHE") {
            self.route_cache = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
        self
    }

    /// The config as a JSON tree, the form dotted lookups walk.
    ///
    /// # Errors
    ///
    /// Fails when a field has no JSON form, such as a `route_cache` path that
    /// is not valid UTF-8.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).context("Failed to render config")
    }

    /// Dotted lookup (`"default_route.module"`) over the serialized config.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let root = self.to_value().ok()?;
        lookup(&root, key).cloned()
    }
}

/// Walk `key` segment by segment through objects and arrays.
///
/// An empty key returns `value` itself.
#[must_use]
pub fn lookup<'v>(value: &'v serde_json::Value, key: &str) -> Option<&'v serde_json::Value> {
    if key.is_empty() {
        return Some(value);
    }
    key.split('.').try_fold(value, |current, segment| match current {
        serde_json::Value::Object(map) => map.get(segment),
        serde_json::Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(!config.debug);
        assert_eq!(config.namespace, "App");
        assert!(config.middleware.is_empty());
        assert_eq!(config.default_route.action, "index");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            namespace = "Shop"
            middleware = ["Trace", "Auth:s3cret"]

            [default_route]
            module = "store"
            "#,
        )
        .unwrap();
        assert_eq!(config.namespace, "Shop");
        assert_eq!(config.middleware, ["Trace", "Auth:s3cret"]);
        assert_eq!(config.default_route.module, "store");
        assert_eq!(config.default_route.controller, "index");
        assert_eq!(config.route_cache, None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "debug = true\nroute_cache = \"routes.json\"\n").unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.route_cache, Some(PathBuf::from("routes.json")));
    }

    #[test]
    fn test_load_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "debug = \"maybe\"").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_dotted_lookup() {
        let config = AppConfig::default();
        assert_eq!(config.get("default_route.module"), Some(json!("home")));
        assert_eq!(config.get("debug"), Some(json!(false)));
        assert_eq!(config.get("default_route.missing"), None);
        assert_eq!(config.get("namespace.deeper"), None);

        let value = json!({"servers": [{"host": "a"}, {"host": "b"}]});
        assert_eq!(lookup(&value, "servers.1.host"), Some(&json!("b")));
    }
}
