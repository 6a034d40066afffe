//! # Controller Module
//!
//! Controllers are plain types registered by fully-qualified name
//! (`App\Controllers\Users`). The dispatcher creates one instance per
//! request and invokes the resolved action on it.
//!
//! ```rust
//! use switchyard::app::Application;
//! use switchyard::controller::{ActionError, Controller, ControllerRegistry};
//! use switchyard::response::ActionOutput;
//!
//! struct Users;
//!
//! impl Controller for Users {
//!     fn create(_app: &Application) -> Self {
//!         Users
//!     }
//!
//!     fn middleware(action: &str) -> &'static [&'static str] {
//!         match action {
//!             "update" => &["Auth"],
//!             _ => &[],
//!         }
//!     }
//!
//!     fn invoke(&mut self, action: &str, app: &mut Application) -> Result<ActionOutput, ActionError> {
//!         match action {
//!             "show" => Ok(format!("user {}", app.attr("id").unwrap_or("?")).into()),
//!             other => Err(ActionError::Undefined(other.to_string())),
//!         }
//!     }
//! }
//!
//! let mut controllers = ControllerRegistry::new();
//! controllers.register::<Users>("App\\Controllers\\Users");
//! assert_eq!(controllers.middleware("App\\Controllers\\Users", "update"), ["Auth"]);
//! ```

mod core;
mod registry;

pub use core::{ActionError, Controller};
pub use registry::ControllerRegistry;
