//! # Dispatcher Module
//!
//! Runs one request end to end:
//!
//! 1. resolve the request with the [`Router`](crate::router::Router)
//! 2. record the match on the [`Application`](crate::app::Application)
//! 3. collect global middleware (skipped for command-line invocations)
//!    followed by the controller's middleware for the action
//! 4. build a [`Chain`](crate::middleware::Chain) whose terminal creates the
//!    controller, invokes the action and wraps its output in a
//!    [`Response`](crate::response::Response)
//! 5. run the chain with the application as payload
//!
//! Routing failures come back as [`DispatchError::Routing`], already mapped to
//! a status by [`DispatchError::status_code`].

mod core;
mod error;

pub use core::{AppMiddlewareRegistry, Dispatcher};
pub use error::DispatchError;
