use std::time::Instant;

use tracing::{debug, error, info, info_span, trace, warn, Level};

use super::{Middleware, Next};
use crate::app::Application;
use crate::dispatcher::DispatchError;
use crate::response::Response;

/// Wraps the rest of the chain in a `request` span and logs its outcome.
///
/// The optional first argument picks the completion log level
/// (`"Trace:debug"`); the default is `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMiddleware;

fn level_from_args(args: &[String]) -> Level {
    match args.first().map(|a| a.to_lowercase()).as_deref() {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        Some("warn") => Level::WARN,
        Some("error") => Level::ERROR,
        _ => Level::INFO,
    }
}

impl Middleware<Application, Response, DispatchError> for TracingMiddleware {
    fn handle(
        &self,
        app: &mut Application,
        next: Next<'_, Application, Response, DispatchError>,
        args: &[String],
    ) -> Result<Response, DispatchError> {
        let (controller, action) = app
            .route()
            .map(|r| (r.controller_name.clone(), r.action_name.clone()))
            .unwrap_or_default();
        let span = info_span!(
            "request",
            request_id = %app.request_id(),
            method = %app.method(),
            path = %app.path(),
            controller = %controller,
            action = %action,
        );

        let start = Instant::now();
        let result = span.in_scope(|| next.run(app));
        let latency_us = start.elapsed().as_micros();
        let status = match &result {
            Ok(_) => 200,
            Err(err) => err.status_code(),
        };

        let _entered = span.enter();
        match level_from_args(args) {
            Level::TRACE => trace!(status, latency_us, "Request completed"),
            Level::DEBUG => debug!(status, latency_us, "Request completed"),
            Level::WARN => warn!(status, latency_us, "Request completed"),
            Level::ERROR => error!(status, latency_us, "Request completed"),
            _ => info!(status, latency_us, "Request completed"),
        }
        result
    }
}
