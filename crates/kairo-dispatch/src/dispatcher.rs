//! Mounting independent applications under path prefixes.

use async_trait::async_trait;
use http::Uri;
use http::uri::PathAndQuery;
use kairo_conf::Settings;
use kairo_exception::{Error, Result};
use kairo_http::{Handler, Request, Response};
use std::sync::Arc;

use crate::application::Application;
use crate::components::Components;

/// Delegates each request to the handler mounted at the longest matching
/// path prefix, or to the root handler.
///
/// The matched prefix moves from the path into `script_name`.
///
/// # Examples
///
/// ```
/// use kairo_dispatch::Dispatcher;
/// use kairo_http::{Handler, Request, Response};
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// struct Where;
///
/// #[async_trait]
/// impl Handler for Where {
///     async fn handle(&self, request: Request) -> kairo_exception::Result<Response> {
///         Ok(Response::ok().with_body(format!("{}|{}", request.script_name, request.path())))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let dispatcher = Dispatcher::new(Arc::new(Where)).mount("/admin", Arc::new(Where));
/// let request = Request::builder().uri("/admin/users?page=2").build().unwrap();
/// let response = dispatcher.handle(request).await.unwrap();
/// assert_eq!(response.body_text(), "/admin|/users");
/// # });
/// ```
pub struct Dispatcher {
	root: Arc<dyn Handler>,
	mounts: Vec<(String, Arc<dyn Handler>)>,
}

impl Dispatcher {
	pub fn new(root: Arc<dyn Handler>) -> Self {
		Self {
			root,
			mounts: Vec::new(),
		}
	}

	pub fn mount(mut self, prefix: &str, handler: Arc<dyn Handler>) -> Self {
		let prefix = format!("/{}", prefix.trim_matches('/'));
		self.mounts.retain(|(existing, _)| *existing != prefix);
		self.mounts.push((prefix, handler));
		// Longest prefix first
		self.mounts.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
		self
	}

	pub fn prefixes(&self) -> impl Iterator<Item = &str> {
		self.mounts.iter().map(|(prefix, _)| prefix.as_str())
	}

	fn find(&self, path: &str) -> Option<(&str, &Arc<dyn Handler>)> {
		self.mounts
			.iter()
			.find(|(prefix, _)| {
				path == prefix
					|| path
						.strip_prefix(prefix.as_str())
						.is_some_and(|rest| rest.starts_with('/'))
			})
			.map(|(prefix, handler)| (prefix.as_str(), handler))
	}
}

#[async_trait]
impl Handler for Dispatcher {
	async fn handle(&self, mut request: Request) -> Result<Response> {
		let Some((prefix, handler)) = self.find(request.path()) else {
			return self.root.handle(request).await;
		};

		let rest = match &request.path()[prefix.len()..] {
			"" => "/",
			rest => rest,
		};
		let path_and_query = match request.uri.query() {
			Some(query) => format!("{}?{}", rest, query),
			None => rest.to_string(),
		};
		let mut parts = request.uri.clone().into_parts();
		parts.path_and_query = Some(
			PathAndQuery::try_from(path_and_query)
				.map_err(|err| Error::Internal(format!("invalid mounted path: {}", err)))?,
		);
		request.uri =
			Uri::from_parts(parts).map_err(|err| Error::Internal(format!("invalid mounted uri: {}", err)))?;
		request.script_name = format!("{}{}", request.script_name.trim_end_matches('/'), prefix);

		handler.handle(request).await
	}
}

/// Root application wrapped in a [`Dispatcher`] with one sub-application
/// per entry of `submount_apps`, mounted at `/{name}`.
///
/// `load_submount` builds the application for a name, typically from that
/// application's own settings file.
///
/// # Errors
///
/// The first error returned by `load_submount`.
pub fn get_application<F>(
	settings: Settings,
	components: Components,
	mut load_submount: F,
) -> Result<Dispatcher>
where
	F: FnMut(&str) -> Result<Application>,
{
	let submounts = settings.submount_apps.clone();
	let mut dispatcher = Dispatcher::new(Arc::new(Application::new(settings, components)));
	for name in &submounts {
		let app = load_submount(name)?;
		tracing::debug!(app = %name, "mounting sub-application");
		dispatcher = dispatcher.mount(name, Arc::new(app));
	}
	Ok(dispatcher)
}
