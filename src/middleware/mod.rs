//! # Middleware Module
//!
//! A generic onion pipeline. [`Pipeline`] folds a list of
//! [`MiddlewareSpec`]s around a terminal handler into a [`Chain`]; running
//! the chain threads one payload by `&mut` through every layer in order.
//! Middleware are looked up by name in a [`MiddlewareRegistry`] and created
//! fresh for each run.
//!
//! The built-in [`AuthMiddleware`] (`Auth:<token>`) and
//! [`TracingMiddleware`] (`Trace[:level]`) work on the dispatcher's
//! [`Application`] payload; [`builtin`] returns a registry holding both.

mod auth;
mod core;
mod pipeline;
mod registry;
mod spec;
mod tracing;

pub use auth::AuthMiddleware;
pub use core::{FnMiddleware, Middleware, Next, Terminal};
pub use pipeline::{Chain, Link, Pipeline, PipelineError};
pub use registry::MiddlewareRegistry;
pub use spec::{ArgVec, MiddlewareSpec};
pub use tracing::TracingMiddleware;

use crate::app::Application;
use crate::dispatcher::DispatchError;
use crate::response::Response;

/// Registry with `Auth` and `Trace` registered
#[must_use]
pub fn builtin() -> MiddlewareRegistry<Application, Response, DispatchError> {
    let mut registry = MiddlewareRegistry::new();
    registry
        .register("Auth", AuthMiddleware::default)
        .register("Trace", || TracingMiddleware);
    registry
}
