use async_trait::async_trait;
use kairo_exception::Result;
use std::sync::Arc;

use crate::{Request, Response};

/// Core abstraction for turning a request into a response.
///
/// The server talks to applications exclusively through this trait.
///
/// # Examples
///
/// ```
/// use kairo_http::{Handler, Request, Response};
/// use async_trait::async_trait;
///
/// struct Hello;
///
/// #[async_trait]
/// impl Handler for Hello {
///     async fn handle(&self, _request: Request) -> kairo_http::Result<Response> {
///         Ok(Response::ok().with_body("Hello!"))
///     }
/// }
/// ```
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles an HTTP request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error only for failures that must not be turned into a
	/// response (startup misconfiguration, process exit, debugger passthrough).
	async fn handle(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}
