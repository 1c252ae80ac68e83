//! The per-request state machine.
//!
//! ```text
//! route ─► request middleware ─► resolve view ─► view middleware ─► view
//!   │              │                   │                │             │
//!   └──────────────┴───── error ───────┴────────────────┴─► exception middleware
//!                                                                 │
//!                      response ◄── failure translation ◄─────────┘
//!                          │
//!                 response middleware ─► overrides ─► caller
//! ```

use kairo_exception::{Error, Result};
use kairo_http::{Request, Response};
use kairo_i18n::{MessageCatalog, get_language_from_request};
use kairo_middleware::MiddlewarePipeline;
use kairo_urls::{MapAdapter, RoutingError};
use kairo_views::invoke;
use std::sync::Arc;

use crate::application::Application;
use crate::context::{CURRENT, RequestContext};
use crate::exception;
use crate::urlconf::Routing;

/// Tenant domain matched by a marketplace app's route.
///
/// Attached before request middleware runs when `marketplace_domain_key`
/// is set and the matched rule has that parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceDomain(pub String);

/// The marketplace domain of `request`, if its route carried one.
pub fn marketplace_domain(request: &Request) -> Option<&str> {
	request
		.extensions()
		.get::<MarketplaceDomain>()
		.map(|domain| domain.0.as_str())
}

impl Application {
	/// Handle one request from routing to the final response.
	///
	/// Only configuration errors raised while bringing the application up,
	/// [`Error::Exit`], uncaught failures on a debugging development server
	/// and response middleware failures reach the caller.
	pub(crate) async fn process(&self, mut request: Request) -> Result<Response> {
		let routing = self.routing().await?;
		let adapter = routing.map.bind_to_request(&request);

		let (lang, catalog) = self.select_language(&request);
		request.lang = lang.clone();

		let context = Arc::new(RequestContext::new(
			&self.settings.app_name,
			request.method.clone(),
			request.path(),
			adapter.clone(),
			lang,
			catalog,
			routing.auth_backend.clone(),
		));

		let hooks = self.components.hooks.clone();
		hooks.request_started(&context);
		let _teardown = scopeguard::guard(Arc::clone(&context), move |context| {
			hooks.request_finished(&context);
		});

		CURRENT
			.scope(
				Arc::clone(&context),
				self.run(request, &routing, &adapter, &context),
			)
			.await
	}

	async fn run(
		&self,
		mut request: Request,
		routing: &Routing,
		adapter: &MapAdapter,
		context: &RequestContext,
	) -> Result<Response> {
		let pipeline = self.pipeline().await?;

		let response = match self
			.get_response(&mut request, routing, adapter, &pipeline)
			.await
		{
			Ok(response) => response,
			Err(err) => exception::translate(self, &mut request, err).await?,
		};

		let mut response = pipeline.run_response(&request, response).await?;
		context.apply_overrides(&mut response);
		Ok(response)
	}

	async fn get_response(
		&self,
		request: &mut Request,
		routing: &Routing,
		adapter: &MapAdapter,
		pipeline: &MiddlewarePipeline,
	) -> Result<Response> {
		let route = match adapter.match_route(&request.method) {
			Ok(route) => route,
			Err(RoutingError::RequestRedirect { mut new_url }) => {
				let query = request.encoded_query();
				if !query.is_empty() {
					new_url.push('?');
					new_url.push_str(&query);
				}
				return Err(Error::Redirect(new_url));
			}
			Err(err) => return Err(err.into()),
		};

		if let Some(key) = &self.settings.marketplace_domain_key
			&& let Some(domain) = route.params.get(key)
		{
			request
				.extensions_mut()
				.insert(MarketplaceDomain(domain.to_string()));
		}

		if let Some(response) = pipeline.run_request(request).await? {
			return Ok(response);
		}

		let view = routing
			.views
			.resolve(&route.endpoint, &self.components.symbols)
			.map_err(|err| {
				tracing::error!(endpoint = %route.endpoint, error = %err, "failed to resolve view");
				Error::from(err)
			})?;

		if let Some(response) = pipeline
			.run_view(request, &route.endpoint, &view, &route.params)
			.await?
		{
			return Ok(response);
		}

		match invoke(&view, request, &route.params).await {
			Ok(response) => Ok(response),
			// Exit bypasses exception middleware.
			Err(err) if err.is_exit() => Err(err),
			Err(err) => match pipeline.run_exception(request, &err).await? {
				Some(response) => Ok(response),
				None => Err(err),
			},
		}
	}

	/// Negotiated language and its catalog; the null catalog without i18n.
	fn select_language(&self, request: &Request) -> (Option<String>, Arc<MessageCatalog>) {
		if !self.settings.use_i18n {
			return (None, Arc::new(MessageCatalog::null()));
		}
		let offered = match self.settings.languages.as_slice() {
			[] => std::slice::from_ref(&self.settings.default_lang),
			languages => languages,
		};
		// Tags outside the offered list never reach the cache.
		let lang = get_language_from_request(request, offered)
			.unwrap_or_else(|| self.settings.default_lang.clone());
		let catalog = self.translations.get_or_load(
			&self.settings.app_name,
			&lang,
			self.components.translations.as_ref(),
		);
		(Some(lang), catalog)
	}
}
