//! Per-request context.
//!
//! A [`RequestContext`] is installed in a task-local scope for the duration
//! of one request. Middleware and views reach it through [`current`]
//! without it being threaded through every signature.

use cookie::Cookie;
use http::header::{HeaderName, HeaderValue, SET_COOKIE};
use http::Method;
use kairo_exception::{Error, Result};
use kairo_http::Response;
use kairo_i18n::MessageCatalog;
use kairo_urls::{MapAdapter, ViewParams};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use crate::auth::AuthBackend;

tokio::task_local! {
	pub(crate) static CURRENT: Arc<RequestContext>;
}

/// Context of the request being handled by the current task.
///
/// Returns `None` outside of a request.
pub fn current() -> Option<Arc<RequestContext>> {
	CURRENT.try_with(Arc::clone).ok()
}

/// Translate `message` with the catalog of the current request.
///
/// Outside of a request the message is returned unchanged.
pub fn gettext(message: &str) -> String {
	match current() {
		Some(context) => context.catalog().gettext(message).to_string(),
		None => message.to_string(),
	}
}

/// Build the URL of `endpoint` against the current request's route table.
///
/// # Errors
///
/// [`Error::ImproperlyConfigured`] outside of a request or when no rule
/// for the endpoint accepts `params`.
pub fn url_for(endpoint: &str, params: &ViewParams, external: bool) -> Result<String> {
	let context = current().ok_or_else(|| {
		Error::ImproperlyConfigured("url_for called outside of a request".to_string())
	})?;
	Ok(context.adapter().build(endpoint, params, external)?)
}

#[derive(Default)]
struct Overrides {
	headers: Vec<(HeaderName, HeaderValue)>,
	cookies: Vec<Cookie<'static>>,
}

/// State shared by everything running on behalf of one request.
pub struct RequestContext {
	app_name: String,
	method: Method,
	path: String,
	adapter: MapAdapter,
	lang: Option<String>,
	catalog: Arc<MessageCatalog>,
	auth_backend: Option<Arc<dyn AuthBackend>>,
	overrides: Mutex<Overrides>,
}

impl RequestContext {
	pub(crate) fn new(
		app_name: &str,
		method: Method,
		path: &str,
		adapter: MapAdapter,
		lang: Option<String>,
		catalog: Arc<MessageCatalog>,
		auth_backend: Option<Arc<dyn AuthBackend>>,
	) -> Self {
		Self {
			app_name: app_name.to_string(),
			method,
			path: path.to_string(),
			adapter,
			lang,
			catalog,
			auth_backend,
			overrides: Mutex::new(Overrides::default()),
		}
	}

	pub fn app_name(&self) -> &str {
		&self.app_name
	}

	pub fn method(&self) -> &Method {
		&self.method
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	/// Route table bound to this request.
	pub fn adapter(&self) -> &MapAdapter {
		&self.adapter
	}

	pub fn lang(&self) -> Option<&str> {
		self.lang.as_deref()
	}

	pub fn catalog(&self) -> &MessageCatalog {
		&self.catalog
	}

	pub fn auth_backend(&self) -> Option<&Arc<dyn AuthBackend>> {
		self.auth_backend.as_ref()
	}

	/// Add a header to the final response, after response middleware ran.
	pub fn override_header(&self, name: HeaderName, value: HeaderValue) {
		self.overrides.lock().headers.push((name, value));
	}

	/// Set a cookie on the final response, after response middleware ran.
	pub fn override_cookie(&self, cookie: Cookie<'static>) {
		self.overrides.lock().cookies.push(cookie);
	}

	/// Move the pending overrides onto `response`.
	pub(crate) fn apply_overrides(&self, response: &mut Response) {
		let overrides = std::mem::take(&mut *self.overrides.lock());
		for (name, value) in overrides.headers {
			response.headers.append(name, value);
		}
		for cookie in overrides.cookies {
			if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
				response.headers.append(SET_COOKIE, value);
			}
		}
	}
}

impl fmt::Debug for RequestContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RequestContext")
			.field("app_name", &self.app_name)
			.field("method", &self.method)
			.field("path", &self.path)
			.field("lang", &self.lang)
			.finish_non_exhaustive()
	}
}

/// Callback observing a request context.
pub type ContextHook = Arc<dyn Fn(&RequestContext) + Send + Sync>;

/// Callbacks run when a request context is installed and torn down.
#[derive(Clone, Default)]
pub struct RequestHooks {
	started: Vec<ContextHook>,
	finished: Vec<ContextHook>,
}

impl RequestHooks {
	pub fn on_request_started<F>(&mut self, hook: F)
	where
		F: Fn(&RequestContext) + Send + Sync + 'static,
	{
		self.started.push(Arc::new(hook));
	}

	pub fn on_request_finished<F>(&mut self, hook: F)
	where
		F: Fn(&RequestContext) + Send + Sync + 'static,
	{
		self.finished.push(Arc::new(hook));
	}

	pub(crate) fn request_started(&self, context: &RequestContext) {
		for hook in &self.started {
			hook(context);
		}
	}

	pub(crate) fn request_finished(&self, context: &RequestContext) {
		for hook in &self.finished {
			hook(context);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use kairo_urls::{ParamValue, Rule, UrlMap};

	fn context() -> RequestContext {
		let mut map = UrlMap::new();
		map.add(Rule::new("/posts/{id:int}", "show")).unwrap();
		let adapter = Arc::new(map).bind(Some("example.com"), "/", "", "http");
		RequestContext::new(
			"blog",
			Method::GET,
			"/",
			adapter,
			None,
			Arc::new(MessageCatalog::null()),
			None,
		)
	}

	#[test]
	fn test_overrides_are_applied_once() {
		let context = context();
		context.override_header(
			HeaderName::from_static("x-served-by"),
			HeaderValue::from_static("kairo"),
		);
		context.override_cookie(Cookie::new("hl", "ja"));

		let mut response = Response::ok();
		context.apply_overrides(&mut response);
		assert_eq!(response.headers["x-served-by"], "kairo");
		assert_eq!(response.headers[SET_COOKIE], "hl=ja");

		let mut second = Response::ok();
		context.apply_overrides(&mut second);
		assert!(second.headers.is_empty());
	}

	#[test]
	fn test_no_context_outside_request() {
		assert!(current().is_none());
		assert_eq!(gettext("Hello"), "Hello");
		assert!(url_for("show", &ViewParams::new(), false).is_err());
	}

	#[tokio::test]
	async fn test_url_for_inside_scope() {
		let context = Arc::new(context());
		let url = CURRENT
			.scope(context, async {
				let mut params = ViewParams::new();
				params.insert("id".into(), ParamValue::Int(7));
				url_for("show", &params, true)
			})
			.await
			.unwrap();
		assert_eq!(url, "http://example.com/posts/7");
	}
}
