use std::sync::Arc;

use super::pipeline::{Link, PipelineError};
use super::registry::MiddlewareRegistry;

/// Terminal step of a chain
pub type Terminal<'a, P, T, E> = dyn Fn(&mut P) -> Result<T, E> + 'a;

/// A layer of the onion around a terminal handler.
///
/// `P` is the payload threaded through every layer, `T` the value the chain
/// produces and `E` its error. A middleware either calls `next.run(payload)`
/// (optionally touching the payload before and the result after) or returns
/// without calling it, which stops the chain.
pub trait Middleware<P, T, E>: Send + Sync {
    fn handle(&self, payload: &mut P, next: Next<'_, P, T, E>, args: &[String]) -> Result<T, E>;
}

/// Handle to the rest of the chain.
///
/// Consumed by [`Next::run`], so downstream runs at most once per layer.
pub struct Next<'a, P, T, E> {
    pub(super) link: &'a Link,
    pub(super) registry: &'a MiddlewareRegistry<P, T, E>,
    pub(super) terminal: &'a Terminal<'a, P, T, E>,
}

impl<'a, P, T, E> Next<'a, P, T, E>
where
    P: 'static,
    T: 'static,
    E: From<PipelineError> + 'static,
{
    /// Run the remaining layers and the terminal.
    ///
    /// # Errors
    ///
    /// Whatever downstream returns, or [`PipelineError::UnknownMiddleware`]
    /// converted into `E`.
    pub fn run(self, payload: &mut P) -> Result<T, E> {
        self.link.run(payload, self.registry, self.terminal)
    }

    /// Number of layers still to run, not counting the terminal
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.link.depth()
    }
}

/// Adapts a closure into a [`Middleware`].
pub struct FnMiddleware<F>(pub Arc<F>);

impl<F> FnMiddleware<F> {
    pub fn new(f: F) -> Self {
        Self(Arc::new(f))
    }
}

impl<F> Clone for FnMiddleware<F> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<P, T, E, F> Middleware<P, T, E> for FnMiddleware<F>
where
    F: Fn(&mut P, Next<'_, P, T, E>, &[String]) -> Result<T, E> + Send + Sync,
{
    fn handle(&self, payload: &mut P, next: Next<'_, P, T, E>, args: &[String]) -> Result<T, E> {
        (self.0)(payload, next, args)
    }
}
