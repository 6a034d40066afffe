use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::core::{FnMiddleware, Middleware, Next};
use super::pipeline::PipelineError;

type Factory<P, T, E> = Arc<dyn Fn() -> Box<dyn Middleware<P, T, E>> + Send + Sync>;

/// Name -> factory map used to instantiate middleware when a chain runs.
///
/// Each run of a layer gets a fresh instance, so middleware carry no state
/// from one request to the next.
pub struct MiddlewareRegistry<P, T, E> {
    factories: HashMap<String, Factory<P, T, E>>,
}

impl<P, T, E> Default for MiddlewareRegistry<P, T, E> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }
}

impl<P, T, E> Clone for MiddlewareRegistry<P, T, E> {
    fn clone(&self) -> Self {
        Self {
            factories: self.factories.clone(),
        }
    }
}

impl<P, T, E> fmt::Debug for MiddlewareRegistry<P, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("MiddlewareRegistry")
            .field("names", &names)
            .finish()
    }
}

impl<P, T, E> MiddlewareRegistry<P, T, E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<P: 'static, T: 'static, E: 'static> MiddlewareRegistry<P, T, E> {
    /// Register a factory under `name`, replacing any previous one.
    pub fn register<M, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        M: Middleware<P, T, E> + 'static,
        F: Fn() -> M + Send + Sync + 'static,
    {
        self.factories.insert(
            name.into(),
            Arc::new(move || Box::new(factory()) as Box<dyn Middleware<P, T, E>>),
        );
        self
    }

    /// Register a closure as middleware.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut P, Next<'_, P, T, E>, &[String]) -> Result<T, E> + Send + Sync + 'static,
    {
        let middleware = FnMiddleware::new(f);
        self.register(name, move || middleware.clone())
    }

    /// Create a fresh instance of the middleware registered as `name`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnknownMiddleware`] if nothing is registered under `name`.
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn Middleware<P, T, E>>, PipelineError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| PipelineError::UnknownMiddleware(name.to_string()))
    }
}
