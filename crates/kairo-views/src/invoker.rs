use futures::FutureExt;
use kairo_exception::{Error, Result};
use kairo_http::{Request, Response};
use kairo_urls::ViewParams;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::View;

/// Call a view with the matched parameters.
///
/// A panic inside the view is caught at this boundary and reported as
/// [`Error::Internal`], so it flows through exception handling like any
/// other view failure.
///
/// # Examples
///
/// ```
/// use kairo_views::{invoke, view_fn};
/// use kairo_http::{Request, Response};
/// use kairo_urls::ViewParams;
///
/// # tokio_test::block_on(async {
/// let view = view_fn(|_, params| {
///     Box::pin(async move {
///         if params.is_empty() {
///             panic!("boom");
///         }
///         Ok(Response::ok())
///     })
/// });
/// let request = Request::builder().uri("/").build().unwrap();
/// let err = invoke(&view, &request, &ViewParams::new()).await.unwrap_err();
/// assert_eq!(err.to_string(), "Internal error: view panicked: boom");
/// # });
/// ```
pub async fn invoke(
	view: &Arc<dyn View>,
	request: &Request,
	params: &ViewParams,
) -> Result<Response> {
	match AssertUnwindSafe(view.call(request, params))
		.catch_unwind()
		.await
	{
		Ok(result) => result,
		Err(panic) => {
			let message = panic_message(panic.as_ref());
			tracing::error!(path = %request.path(), panic = %message, "view panicked");
			Err(Error::Internal(format!("view panicked: {}", message)))
		}
	}
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
	if let Some(message) = panic.downcast_ref::<&str>() {
		message
	} else if let Some(message) = panic.downcast_ref::<String>() {
		message
	} else {
		"unknown panic payload"
	}
}
