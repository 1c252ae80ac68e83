use async_trait::async_trait;
use futures::future::BoxFuture;
use kairo_exception::Result;
use kairo_http::{Request, Response};
use kairo_urls::ViewParams;
use std::sync::Arc;

/// Application view logic bound to an endpoint.
///
/// The matched URL parameters are passed as `params`.
#[async_trait]
pub trait View: Send + Sync {
	async fn call(&self, request: &Request, params: &ViewParams) -> Result<Response>;
}

#[async_trait]
impl<T: View + ?Sized> View for Arc<T> {
	async fn call(&self, request: &Request, params: &ViewParams) -> Result<Response> {
		(**self).call(request, params).await
	}
}

/// A view backed by a closure returning a boxed future.
pub struct FnView<F> {
	func: F,
}

#[async_trait]
impl<F> View for FnView<F>
where
	F: for<'a> Fn(&'a Request, &'a ViewParams) -> BoxFuture<'a, Result<Response>> + Send + Sync,
{
	async fn call(&self, request: &Request, params: &ViewParams) -> Result<Response> {
		(self.func)(request, params).await
	}
}

/// Wrap a closure as a shared view.
///
/// # Examples
///
/// ```
/// use kairo_views::view_fn;
/// use kairo_http::Response;
///
/// let hello = view_fn(|_request, params| {
///     Box::pin(async move {
///         let name = params
///             .get("name")
///             .map(|v| v.to_string())
///             .unwrap_or_else(|| "world".into());
///         Ok(Response::ok().with_body(format!("Hello, {}!", name)))
///     })
/// });
/// # let _ = hello;
/// ```
pub fn view_fn<F>(func: F) -> Arc<dyn View>
where
	F: for<'a> Fn(&'a Request, &'a ViewParams) -> BoxFuture<'a, Result<Response>>
		+ Send
		+ Sync
		+ 'static,
{
	Arc::new(FnView { func })
}
