use thiserror::Error;

use crate::app::Application;
use crate::response::ActionOutput;

/// Failure returned by a controller action
#[derive(Debug, Error)]
pub enum ActionError {
    /// The controller has no action with this name
    #[error("action `{0}` is not defined")]
    Undefined(String),
    /// Abort with an explicit transport status
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl ActionError {
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ActionError::Http {
            status,
            message: message.into(),
        }
    }
}

/// A request handler type with named actions.
pub trait Controller: Send + 'static {
    /// Build the instance serving one request.
    fn create(app: &Application) -> Self
    where
        Self: Sized;

    /// Middleware specs declared for `action`, run after global middleware.
    fn middleware(_action: &str) -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }

    /// Run `action`.
    ///
    /// # Errors
    ///
    /// [`ActionError::Undefined`] for unknown actions; anything else the
    /// action itself fails with.
    fn invoke(&mut self, action: &str, app: &mut Application) -> Result<ActionOutput, ActionError>;
}
