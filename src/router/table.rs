//! Route table - stores registered routes and matches request paths.
//!
//! Static routes live in a per-method map and are checked first. Variable
//! routes are compiled to anchored regexes and tried in registration order.
//! A `HEAD` request that matches nothing falls back to the `GET` routes, and a
//! path that only matches under other methods reports those methods.

use http::Method;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::error::RouteDefinitionError;
use super::pattern::{self, Segment};

/// A route as it was registered: one method, one pattern, one handler string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    pub method: String,
    pub pattern: String,
    pub handler: String,
}

/// Outcome of a table lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found {
        handler: String,
        vars: HashMap<String, String>,
    },
    NotFound,
    MethodNotAllowed(BTreeSet<String>),
}

#[derive(Debug, Clone)]
struct VariableRoute {
    regex: Regex,
    param_names: Vec<String>,
    handler: String,
    /// Rendered variant, kept for duplicate detection and logs
    route: String,
}

impl VariableRoute {
    fn captures(&self, path: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(path)?;
        let mut vars = HashMap::with_capacity(self.param_names.len());
        for (idx, name) in self.param_names.iter().enumerate() {
            if let Some(m) = caps.get(idx + 1) {
                vars.insert(name.clone(), m.as_str().to_string());
            }
        }
        Some(vars)
    }
}

/// Read-only after registration; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    static_routes: HashMap<Method, HashMap<String, String>>,
    variable_routes: HashMap<Method, Vec<VariableRoute>>,
    specs: Vec<RouteSpec>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` on every variant of `route_pattern`.
    ///
    /// # Errors
    ///
    /// Fails on malformed patterns and on routes that collide with an
    /// existing registration for the same method.
    pub fn add(
        &mut self,
        method: Method,
        route_pattern: &str,
        handler: &str,
    ) -> Result<(), RouteDefinitionError> {
        let mut statics: Vec<String> = Vec::new();
        let mut variables: Vec<VariableRoute> = Vec::new();
        for variant in pattern::parse(route_pattern)? {
            if pattern::is_static(&variant) {
                statics.push(self.check_static(&method, &variant, &statics, &variables)?);
            } else {
                variables.push(self.compile_variable(&method, &variant, handler, &variables)?);
            }
        }

        // Nothing becomes visible to lookups unless every variant passed.
        if !statics.is_empty() {
            let routes = self.static_routes.entry(method.clone()).or_default();
            for route in statics {
                routes.insert(route, handler.to_string());
            }
        }
        if !variables.is_empty() {
            self.variable_routes
                .entry(method.clone())
                .or_default()
                .extend(variables);
        }

        self.specs.push(RouteSpec {
            method: method.as_str().to_string(),
            pattern: route_pattern.to_string(),
            handler: handler.to_string(),
        });
        Ok(())
    }

    fn registered_variables(&self, method: &Method) -> &[VariableRoute] {
        self.variable_routes.get(method).map_or(&[][..], Vec::as_slice)
    }

    fn check_static(
        &self,
        method: &Method,
        variant: &[Segment],
        staged_statics: &[String],
        staged_variables: &[VariableRoute],
    ) -> Result<String, RouteDefinitionError> {
        let route = pattern::render(variant);

        if let Some(existing) = self
            .registered_variables(method)
            .iter()
            .chain(staged_variables)
            .find(|r| r.regex.is_match(&route))
        {
            return Err(RouteDefinitionError::ShadowedStaticRoute {
                method: method.to_string(),
                route,
                shadowed_by: existing.route.clone(),
            });
        }

        let taken = self
            .static_routes
            .get(method)
            .is_some_and(|routes| routes.contains_key(&route))
            || staged_statics.contains(&route);
        if taken {
            return Err(RouteDefinitionError::DuplicateRoute {
                method: method.to_string(),
                route,
            });
        }
        Ok(route)
    }

    fn compile_variable(
        &self,
        method: &Method,
        variant: &[Segment],
        handler: &str,
        staged: &[VariableRoute],
    ) -> Result<VariableRoute, RouteDefinitionError> {
        let route = pattern::render(variant);
        let (regex, param_names) = Self::variant_to_regex(&route, variant)?;

        if self
            .registered_variables(method)
            .iter()
            .chain(staged)
            .any(|r| r.regex.as_str() == regex.as_str())
        {
            return Err(RouteDefinitionError::DuplicateRoute {
                method: method.to_string(),
                route,
            });
        }
        Ok(VariableRoute {
            regex,
            param_names,
            handler: handler.to_string(),
            route,
        })
    }

    /// Compile a variant into an anchored regex and its ordered parameter names.
    ///
    /// `/users/{id:\d+}/posts` becomes `^/users/(\d+)/posts$` with `["id"]`.
    fn variant_to_regex(
        route: &str,
        variant: &[Segment],
    ) -> Result<(Regex, Vec<String>), RouteDefinitionError> {
        let mut source = String::with_capacity(route.len() + 8);
        source.push('^');
        let mut param_names: Vec<String> = Vec::new();

        for segment in variant {
            match segment {
                Segment::Static(text) => source.push_str(&regex::escape(text)),
                Segment::Variable { name, regex } => {
                    if param_names.iter().any(|n| n == name) {
                        return Err(RouteDefinitionError::DuplicatePlaceholder {
                            route: route.to_string(),
                            name: name.clone(),
                        });
                    }
                    let compiled =
                        Regex::new(regex).map_err(|source| RouteDefinitionError::InvalidRegex {
                            name: name.clone(),
                            regex: regex.clone(),
                            source,
                        })?;
                    if compiled.captures_len() > 1 {
                        return Err(RouteDefinitionError::CapturingGroup {
                            name: name.clone(),
                            regex: regex.clone(),
                        });
                    }
                    source.push('(');
                    source.push_str(regex);
                    source.push(')');
                    param_names.push(name.clone());
                }
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|err| RouteDefinitionError::InvalidRegex {
            name: param_names.last().cloned().unwrap_or_default(),
            regex: source.clone(),
            source: err,
        })?;
        Ok((regex, param_names))
    }

    /// Match `path` (already normalized) for `method`.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> Lookup {
        if let Some(found) = self.match_method(method, path) {
            return found;
        }
        if *method == Method::HEAD {
            if let Some(found) = self.match_method(&Method::GET, path) {
                return found;
            }
        }

        let allowed = self.allowed_methods(path, Some(method));
        if allowed.is_empty() {
            Lookup::NotFound
        } else {
            Lookup::MethodNotAllowed(allowed)
        }
    }

    /// Every method with a route matching `path`, optionally skipping one.
    #[must_use]
    pub fn allowed_methods(&self, path: &str, except: Option<&Method>) -> BTreeSet<String> {
        self.static_routes
            .keys()
            .chain(self.variable_routes.keys())
            .filter(|m| Some(*m) != except)
            .filter(|m| self.match_method(m, path).is_some())
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn match_method(&self, method: &Method, path: &str) -> Option<Lookup> {
        if let Some(handler) = self.static_routes.get(method).and_then(|r| r.get(path)) {
            return Some(Lookup::Found {
                handler: handler.clone(),
                vars: HashMap::new(),
            });
        }

        self.variable_routes.get(method)?.iter().find_map(|route| {
            route.captures(path).map(|vars| Lookup::Found {
                handler: route.handler.clone(),
                vars,
            })
        })
    }

    /// Registered routes in registration order
    #[must_use]
    pub fn routes(&self) -> &[RouteSpec] {
        &self.specs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
