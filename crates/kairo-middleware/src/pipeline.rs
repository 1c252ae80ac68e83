//! Ordered middleware phases.

use kairo_exception::{Error, Result};
use kairo_http::{Request, Response};
use kairo_urls::ViewParams;
use kairo_views::View;
use std::fmt;
use std::sync::Arc;

use crate::{HookSet, Middleware, MiddlewareRegistry};

/// A constructed middleware and the identifier it was built from
#[derive(Clone)]
pub struct MiddlewareEntry {
	pub id: String,
	pub middleware: Arc<dyn Middleware>,
}

impl fmt::Debug for MiddlewareEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MiddlewareEntry").field("id", &self.id).finish()
	}
}

/// Four ordered hook lists built from the configured identifiers.
///
/// Request and view hooks run in declaration order; response and exception
/// hooks run in reverse declaration order.
#[derive(Debug, Clone, Default)]
pub struct MiddlewarePipeline {
	request: Vec<MiddlewareEntry>,
	view: Vec<MiddlewareEntry>,
	response: Vec<MiddlewareEntry>,
	exception: Vec<MiddlewareEntry>,
}

impl MiddlewarePipeline {
	pub fn empty() -> Self {
		Self::default()
	}

	/// Construct every configured middleware and sort it into hook lists.
	///
	/// # Errors
	///
	/// [`Error::ImproperlyConfigured`] when an identifier is unknown or a
	/// factory fails with anything but [`Error::MiddlewareNotUsed`].
	///
	/// # Examples
	///
	/// ```
	/// use kairo_middleware::{LoggingMiddleware, MiddlewarePipeline, MiddlewareRegistry};
	///
	/// let registry = MiddlewareRegistry::with_builtins();
	/// let pipeline = MiddlewarePipeline::build(
	///     &[LoggingMiddleware::IDENTIFIER.to_string()],
	///     &registry,
	/// ).unwrap();
	/// assert_eq!(pipeline.request_ids(), vec![LoggingMiddleware::IDENTIFIER]);
	///
	/// let err = MiddlewarePipeline::build(&["site.Missing".to_string()], &registry).unwrap_err();
	/// assert!(err.to_string().contains("isn't a valid middleware"));
	/// ```
	pub fn build(identifiers: &[String], registry: &MiddlewareRegistry) -> Result<Self> {
		let mut pipeline = Self::empty();

		for id in identifiers {
			let factory = registry.get(id).ok_or_else(|| {
				Error::ImproperlyConfigured(format!(
					"Error importing middleware {}: isn't a valid middleware",
					id
				))
			})?;

			let middleware = match factory() {
				Ok(middleware) => middleware,
				Err(Error::MiddlewareNotUsed) => {
					tracing::debug!(middleware = %id, "middleware not used, skipping");
					continue;
				}
				Err(err) => {
					return Err(Error::ImproperlyConfigured(format!(
						"Error constructing middleware {}: {}",
						id, err
					)));
				}
			};

			pipeline.push(id.clone(), middleware);
		}

		Ok(pipeline)
	}

	fn push(&mut self, id: String, middleware: Arc<dyn Middleware>) {
		let hooks: HookSet = middleware.hooks();
		let entry = MiddlewareEntry { id, middleware };
		if hooks.request {
			self.request.push(entry.clone());
		}
		if hooks.view {
			self.view.push(entry.clone());
		}
		if hooks.response {
			self.response.insert(0, entry.clone());
		}
		if hooks.exception {
			self.exception.insert(0, entry);
		}
	}

	/// Run request hooks until one responds.
	pub async fn run_request(&self, request: &mut Request) -> Result<Option<Response>> {
		for entry in &self.request {
			if let Some(response) = entry.middleware.process_request(request).await?.into_response() {
				tracing::debug!(middleware = %entry.id, "request hook short-circuited");
				return Ok(Some(response));
			}
		}
		Ok(None)
	}

	/// Run view hooks until one responds.
	pub async fn run_view(
		&self,
		request: &mut Request,
		endpoint: &str,
		view: &Arc<dyn View>,
		params: &ViewParams,
	) -> Result<Option<Response>> {
		for entry in &self.view {
			if let Some(response) = entry
				.middleware
				.process_view(request, endpoint, view, params)
				.await?
				.into_response()
			{
				tracing::debug!(middleware = %entry.id, "view hook short-circuited");
				return Ok(Some(response));
			}
		}
		Ok(None)
	}

	/// Pass the response through every response hook.
	pub async fn run_response(&self, request: &Request, mut response: Response) -> Result<Response> {
		for entry in &self.response {
			response = entry.middleware.process_response(request, response).await?;
		}
		Ok(response)
	}

	/// Offer a view failure to exception hooks; the first response wins.
	pub async fn run_exception(&self, request: &Request, error: &Error) -> Result<Option<Response>> {
		for entry in &self.exception {
			if let Some(response) = entry
				.middleware
				.process_exception(request, error)
				.await?
				.into_response()
			{
				return Ok(Some(response));
			}
		}
		Ok(None)
	}

	pub fn request_ids(&self) -> Vec<&str> {
		ids(&self.request)
	}

	pub fn view_ids(&self) -> Vec<&str> {
		ids(&self.view)
	}

	pub fn response_ids(&self) -> Vec<&str> {
		ids(&self.response)
	}

	pub fn exception_ids(&self) -> Vec<&str> {
		ids(&self.exception)
	}

	/// Whether a middleware with `id` participates in any hook.
	pub fn contains(&self, id: &str) -> bool {
		[&self.request, &self.view, &self.response, &self.exception]
			.iter()
			.any(|list| list.iter().any(|entry| entry.id == id))
	}
}

fn ids(entries: &[MiddlewareEntry]) -> Vec<&str> {
	entries.iter().map(|entry| entry.id.as_str()).collect()
}
