//! # switchyard
//!
//! **switchyard** is the request-dispatch core of a small web framework: it
//! resolves an incoming request (an HTTP method and path, or a command-line
//! invocation) to a controller action, then runs that action inside an
//! onion-style middleware pipeline.
//!
//! ## Architecture
//!
//! - **[`router`]** - Route collection, static and pattern matching, the
//!   mapped-route convention and the route cache
//! - **[`middleware`]** - Generic middleware pipeline plus the built-in
//!   `Trace` and `Auth` middleware
//! - **[`controller`]** - The [`Controller`](controller::Controller) trait and
//!   the registry controllers are looked up in
//! - **[`dispatcher`]** - Ties routing, middleware and controllers together
//! - **[`app`]** - Per-request [`Application`] context and its [`RequestId`]
//! - **[`response`]** - Validated response content
//! - **[`config`]**, **[`logging`]** - Configuration and structured logging
//!   bootstrap
//! - **[`cli`]** - The `switchyard` binary
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Entry as Entry point
//!     participant D as Dispatcher
//!     participant R as Router
//!     participant P as Pipeline
//!     participant C as Controller
//!
//!     Entry->>D: handle(&Request)
//!     D->>R: resolve_request(request, controllers)
//!     R-->>D: RouteMatch { controller, action, path_vars }
//!     D->>P: build(global + controller middleware)
//!     P->>P: Trace -> Auth -> ...
//!     P->>C: invoke(action, &mut Application)
//!     C-->>P: ActionOutput
//!     P-->>D: Response
//!     D-->>Entry: Result<Response, DispatchError>
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use switchyard::config::AppConfig;
//! use switchyard::controller::{ActionError, Controller, ControllerRegistry};
//! use switchyard::middleware;
//! use switchyard::response::ActionOutput;
//! use switchyard::{Application, Dispatcher, Request};
//!
//! struct Hello;
//!
//! impl Controller for Hello {
//!     fn create(_app: &Application) -> Self {
//!         Hello
//!     }
//!
//!     fn invoke(&mut self, action: &str, app: &mut Application) -> Result<ActionOutput, ActionError> {
//!         match action {
//!             "greet" => Ok(format!("hello {}", app.attr("name").unwrap_or("world")).into()),
//!             other => Err(ActionError::Undefined(other.to_string())),
//!         }
//!     }
//! }
//!
//! let mut controllers = ControllerRegistry::new();
//! controllers.register::<Hello>("App\\Controllers\\Hello");
//!
//! let dispatcher = Dispatcher::from_config(
//!     AppConfig::default(),
//!     controllers,
//!     middleware::builtin(),
//!     |r| {
//!         r.get("/hello/{name}", "Hello@greet")?;
//!         Ok(())
//!     },
//! )
//! .unwrap();
//!
//! let response = dispatcher.handle(&Request::http("GET", "/hello/ada")).unwrap();
//! assert_eq!(response.to_string(), "hello ada");
//! ```
//!
//! ## Logging
//!
//! Everything logs through `tracing`. Call
//! [`logging::init_logging`] once at startup to install a subscriber.

pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod logging;
pub mod middleware;
pub mod response;
pub mod router;

pub use app::{Application, RequestId};
pub use config::AppConfig;
pub use dispatcher::{DispatchError, Dispatcher};
pub use response::Response;
pub use router::{InvocationMode, Request, Router, RoutingError};
