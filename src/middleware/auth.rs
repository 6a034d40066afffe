use tracing::{debug, warn};

use super::{Middleware, Next};
use crate::app::Application;
use crate::dispatcher::DispatchError;
use crate::response::Response;

/// Rejects requests whose `Authorization` header does not carry the token.
///
/// The token is the first spec argument (`"Auth:s3cret"`), falling back to
/// the one given at construction. Both `Bearer <token>` and the bare token
/// are accepted. Aborts with a 401 [`DispatchError::Http`].
#[derive(Debug, Clone, Default)]
pub struct AuthMiddleware {
    token: Option<String>,
}

impl AuthMiddleware {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    fn expected<'a>(&'a self, args: &'a [String]) -> Option<&'a str> {
        args.first()
            .map(String::as_str)
            .filter(|t| !t.is_empty())
            .or(self.token.as_deref())
    }
}

impl Middleware<Application, Response, DispatchError> for AuthMiddleware {
    fn handle(
        &self,
        app: &mut Application,
        next: Next<'_, Application, Response, DispatchError>,
        args: &[String],
    ) -> Result<Response, DispatchError> {
        let Some(expected) = self.expected(args) else {
            warn!(request_id = %app.request_id(), "Auth middleware has no token configured");
            return Err(DispatchError::http(401, "Unauthorized"));
        };

        let presented = app
            .header("authorization")
            .map(|h| h.strip_prefix("Bearer ").unwrap_or(h).trim().to_string());
        match presented {
            Some(token) if token == expected => {
                debug!(request_id = %app.request_id(), "Request authorized");
                app.set_attribute("auth.token", token);
                next.run(app)
            }
            other => {
                warn!(
                    request_id = %app.request_id(),
                    path = %app.path(),
                    header_present = other.is_some(),
                    "Request rejected: invalid or missing authorization"
                );
                Err(DispatchError::http(401, "Unauthorized"))
            }
        }
    }
}
