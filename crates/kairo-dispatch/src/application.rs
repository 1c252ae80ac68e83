use async_trait::async_trait;
use kairo_conf::Settings;
use kairo_exception::Result;
use kairo_http::{Handler, Request, Response};
use kairo_i18n::TranslationCache;
use kairo_middleware::MiddlewarePipeline;
use kairo_urls::UrlMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::components::Components;
use crate::urlconf::{Routing, build_routing};

/// One configured application.
///
/// The route table and the middleware pipeline are built on first use
/// (or by [`Application::init`]) and then shared by every request. A
/// failed build leaves them unset, so the next request retries.
pub struct Application {
	pub(crate) settings: Arc<Settings>,
	pub(crate) components: Arc<Components>,
	routing: OnceCell<Arc<Routing>>,
	pipeline: OnceCell<Arc<MiddlewarePipeline>>,
	pub(crate) translations: TranslationCache,
}

impl Application {
	pub fn new(settings: Settings, components: Components) -> Self {
		Self::with_shared(Arc::new(settings), Arc::new(components))
	}

	/// Application sharing its collaborators with others.
	pub fn with_shared(settings: Arc<Settings>, components: Arc<Components>) -> Self {
		Self {
			settings,
			components,
			routing: OnceCell::new(),
			pipeline: OnceCell::new(),
			translations: TranslationCache::new(),
		}
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn components(&self) -> &Components {
		&self.components
	}

	/// Build the route table and the middleware pipeline now instead of on
	/// the first request.
	///
	/// # Errors
	///
	/// The configuration error that prevented either build.
	pub async fn init(&self) -> Result<()> {
		self.routing().await?;
		self.pipeline().await?;
		Ok(())
	}

	/// The route table, when it has been built.
	pub fn url_map(&self) -> Option<Arc<UrlMap>> {
		self.routing.get().map(|routing| Arc::clone(&routing.map))
	}

	/// The middleware pipeline, when it has been built.
	pub fn middleware_pipeline(&self) -> Option<Arc<MiddlewarePipeline>> {
		self.pipeline.get().cloned()
	}

	pub fn translation_cache(&self) -> &TranslationCache {
		&self.translations
	}

	pub(crate) async fn routing(&self) -> Result<Arc<Routing>> {
		self.routing
			.get_or_try_init(|| async {
				build_routing(&self.settings, &self.components).map(Arc::new)
			})
			.await
			.cloned()
	}

	pub(crate) async fn pipeline(&self) -> Result<Arc<MiddlewarePipeline>> {
		self.pipeline
			.get_or_try_init(|| async {
				MiddlewarePipeline::build(&self.settings.middleware, &self.components.middleware)
					.map(Arc::new)
			})
			.await
			.cloned()
	}
}

impl fmt::Debug for Application {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Application")
			.field("app_name", &self.settings.app_name)
			.field("routing", &self.routing.get())
			.field("pipeline", &self.pipeline.get())
			.finish_non_exhaustive()
	}
}

#[async_trait]
impl Handler for Application {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.process(request).await
	}
}
