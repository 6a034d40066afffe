use thiserror::Error;

use crate::controller::ActionError;
use crate::middleware::PipelineError;
use crate::response::ResponseContentError;
use crate::router::RoutingError;

/// Everything a single dispatch can fail with.
///
/// Every variant maps to a transport status through
/// [`DispatchError::status_code`].
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Routing(#[from] RoutingError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    ResponseContent(#[from] ResponseContentError),
    #[error("action `{action}` is not defined on controller `{controller}`")]
    UndefinedAction { controller: String, action: String },
    /// Explicit abort with a status, e.g. 401 from an auth middleware
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

impl DispatchError {
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        DispatchError::Http {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::Routing(err) => err.status_code(),
            DispatchError::UndefinedAction { .. } => 404,
            DispatchError::Http { status, .. } => *status,
            DispatchError::Pipeline(_)
            | DispatchError::ResponseContent(_)
            | DispatchError::Handler(_) => 500,
        }
    }

    pub(crate) fn from_action(err: ActionError, controller: &str) -> Self {
        match err {
            ActionError::Undefined(action) => DispatchError::UndefinedAction {
                controller: controller.to_string(),
                action,
            },
            ActionError::Http { status, message } => DispatchError::Http { status, message },
            ActionError::Failed(err) => DispatchError::Handler(err),
        }
    }
}
