//! Route registration API handed to route definition callbacks.

use http::Method;

use super::error::RouteDefinitionError;
use super::table::RouteTable;

/// Methods registered by [`Routes::any`].
pub const ANY_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Collects routes into a [`RouteTable`], applying the current group prefix.
///
/// ```rust
/// use switchyard::router::Routes;
///
/// let mut routes = Routes::new();
/// routes
///     .add_group("/admin", |r| {
///         r.get("/users", "Admin\\Users@index")?;
///         r.post("/users", "Admin\\Users@store")?;
///         Ok(())
///     })
///     .unwrap();
/// assert_eq!(routes.table().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Routes {
    table: RouteTable,
    prefix: String,
}

impl Routes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for each of `methods` on `pattern`.
    ///
    /// # Errors
    ///
    /// See [`RouteTable::add`].
    pub fn add_route(
        &mut self,
        methods: &[Method],
        pattern: &str,
        handler: &str,
    ) -> Result<&mut Self, RouteDefinitionError> {
        let full = format!("{}{}", self.prefix, pattern);
        for method in methods {
            self.table.add(method.clone(), &full, handler)?;
        }
        Ok(self)
    }

    /// Register every route added inside `define` under `prefix`.
    ///
    /// Groups nest: prefixes concatenate.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `define`.
    pub fn add_group<F>(&mut self, prefix: &str, define: F) -> Result<&mut Self, RouteDefinitionError>
    where
        F: FnOnce(&mut Routes) -> Result<(), RouteDefinitionError>,
    {
        let previous_len = self.prefix.len();
        self.prefix.push_str(prefix);
        let result = define(self);
        self.prefix.truncate(previous_len);
        result.map(|()| self)
    }

    pub fn get(&mut self, pattern: &str, handler: &str) -> Result<&mut Self, RouteDefinitionError> {
        self.add_route(&[Method::GET], pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: &str) -> Result<&mut Self, RouteDefinitionError> {
        self.add_route(&[Method::POST], pattern, handler)
    }

    pub fn put(&mut self, pattern: &str, handler: &str) -> Result<&mut Self, RouteDefinitionError> {
        self.add_route(&[Method::PUT], pattern, handler)
    }

    pub fn patch(&mut self, pattern: &str, handler: &str) -> Result<&mut Self, RouteDefinitionError> {
        self.add_route(&[Method::PATCH], pattern, handler)
    }

    pub fn delete(&mut self, pattern: &str, handler: &str) -> Result<&mut Self, RouteDefinitionError> {
        self.add_route(&[Method::DELETE], pattern, handler)
    }

    pub fn head(&mut self, pattern: &str, handler: &str) -> Result<&mut Self, RouteDefinitionError> {
        self.add_route(&[Method::HEAD], pattern, handler)
    }

    pub fn options(&mut self, pattern: &str, handler: &str) -> Result<&mut Self, RouteDefinitionError> {
        self.add_route(&[Method::OPTIONS], pattern, handler)
    }

    /// Register for GET, POST, PUT, PATCH, DELETE and OPTIONS.
    pub fn any(&mut self, pattern: &str, handler: &str) -> Result<&mut Self, RouteDefinitionError> {
        self.add_route(&ANY_METHODS, pattern, handler)
    }

    /// Table built so far
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    #[must_use]
    pub fn into_table(self) -> RouteTable {
        self.table
    }
}
