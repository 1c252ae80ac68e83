use async_trait::async_trait;
use kairo_exception::Result;
use kairo_http::{Request, Response};
use std::time::Instant;

use crate::{HookSet, Middleware, MiddlewareOutcome};

#[derive(Debug, Clone, Copy)]
struct RequestStart(Instant);

/// Logging middleware
/// Logs method, path, status and duration of each request
#[derive(Debug, Default)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
	/// Identifier under which the middleware is registered
	pub const IDENTIFIER: &'static str = "kairo.middleware.logging.LoggingMiddleware";

	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl Middleware for LoggingMiddleware {
	fn hooks(&self) -> HookSet {
		HookSet::NONE.request().response()
	}

	async fn process_request(&self, request: &mut Request) -> Result<MiddlewareOutcome> {
		request.extensions_mut().insert(RequestStart(Instant::now()));
		Ok(MiddlewareOutcome::Continue)
	}

	async fn process_response(&self, request: &Request, response: Response) -> Result<Response> {
		let elapsed_ms = request
			.extensions()
			.get::<RequestStart>()
			.map(|start| start.0.elapsed().as_millis() as u64);

		tracing::info!(
			method = %request.method,
			path = %request.path(),
			status = response.status.as_u16(),
			elapsed_ms,
			"request completed"
		);

		Ok(response)
	}
}
