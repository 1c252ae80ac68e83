use async_trait::async_trait;
use kairo_exception::{Error, Result};
use kairo_http::{Request, Response};
use kairo_urls::ViewParams;
use kairo_views::View;
use std::sync::Arc;

/// Result of a request, view or exception hook.
#[derive(Debug)]
pub enum MiddlewareOutcome {
	/// Keep going
	Continue,
	/// Stop and use this response
	Respond(Response),
}

impl MiddlewareOutcome {
	pub fn into_response(self) -> Option<Response> {
		match self {
			MiddlewareOutcome::Continue => None,
			MiddlewareOutcome::Respond(response) => Some(response),
		}
	}
}

/// Which hooks a middleware participates in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookSet {
	pub request: bool,
	pub view: bool,
	pub response: bool,
	pub exception: bool,
}

impl HookSet {
	pub const NONE: HookSet = HookSet {
		request: false,
		view: false,
		response: false,
		exception: false,
	};

	pub const ALL: HookSet = HookSet {
		request: true,
		view: true,
		response: true,
		exception: true,
	};

	pub const fn request(mut self) -> Self {
		self.request = true;
		self
	}

	pub const fn view(mut self) -> Self {
		self.view = true;
		self
	}

	pub const fn response(mut self) -> Self {
		self.response = true;
		self
	}

	pub const fn exception(mut self) -> Self {
		self.exception = true;
		self
	}
}

/// A component hooking into the request lifecycle.
///
/// Only the hooks declared by [`Middleware::hooks`] are ever called; the
/// others keep their pass-through defaults.
///
/// # Examples
///
/// ```
/// use kairo_middleware::{HookSet, Middleware, MiddlewareOutcome};
/// use kairo_http::{Request, Response};
/// use async_trait::async_trait;
///
/// struct Maintenance;
///
/// #[async_trait]
/// impl Middleware for Maintenance {
///     fn hooks(&self) -> HookSet {
///         HookSet::NONE.request()
///     }
///
///     async fn process_request(&self, _request: &mut Request) -> kairo_exception::Result<MiddlewareOutcome> {
///         Ok(MiddlewareOutcome::Respond(Response::service_unavailable()))
///     }
/// }
/// ```
#[async_trait]
pub trait Middleware: Send + Sync {
	fn hooks(&self) -> HookSet;

	/// Called before view resolution, in declaration order.
	async fn process_request(&self, _request: &mut Request) -> Result<MiddlewareOutcome> {
		Ok(MiddlewareOutcome::Continue)
	}

	/// Called with the resolved view before it runs, in declaration order.
	async fn process_view(
		&self,
		_request: &mut Request,
		_endpoint: &str,
		_view: &Arc<dyn View>,
		_params: &ViewParams,
	) -> Result<MiddlewareOutcome> {
		Ok(MiddlewareOutcome::Continue)
	}

	/// Called on every produced response, in reverse declaration order.
	async fn process_response(&self, _request: &Request, response: Response) -> Result<Response> {
		Ok(response)
	}

	/// Offered a view failure, in reverse declaration order.
	async fn process_exception(
		&self,
		_request: &Request,
		_error: &Error,
	) -> Result<MiddlewareOutcome> {
		Ok(MiddlewareOutcome::Continue)
	}
}
