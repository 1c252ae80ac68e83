//! Collaborators an [`Application`](crate::Application) is assembled from.

use kairo_conf::Settings;
use kairo_exception::{Error, Result};
use kairo_i18n::{StaticLoader, TranslationLoader};
use kairo_mail::{AdminMailer, ConsoleBackend, Mailer};
use kairo_middleware::MiddlewareRegistry;
use kairo_template::{Renderer, TeraRenderer};
use kairo_views::SymbolRegistry;
use std::sync::Arc;

use crate::auth::{AuthBackendRegistry, AuthenticationMiddleware};
use crate::context::{RequestContext, RequestHooks};
use crate::urlconf::UrlConfRegistry;

/// Structured reporting of uncaught failures.
///
/// When configured, it replaces logging the full trace and mailing the
/// site administrators.
pub trait ErrorReporter: Send + Sync {
	fn report(&self, message: &str, error: &Error);
}

/// Registries and services shared by every request of an application.
pub struct Components {
	pub middleware: MiddlewareRegistry,
	pub symbols: SymbolRegistry,
	pub urlconfs: UrlConfRegistry,
	pub auth_backends: AuthBackendRegistry,
	pub renderer: Arc<dyn Renderer>,
	pub translations: Arc<dyn TranslationLoader>,
	pub mailer: Arc<dyn Mailer>,
	pub error_reporter: Option<Arc<dyn ErrorReporter>>,
	pub hooks: RequestHooks,
}

impl Components {
	/// Built-in middleware, the built-in templates, no translations and
	/// admin mail written to the log.
	///
	/// # Errors
	///
	/// [`Error::ImproperlyConfigured`] when the built-in templates fail to
	/// compile.
	pub fn new() -> Result<Self> {
		let renderer = TeraRenderer::new()
			.map_err(|err| Error::ImproperlyConfigured(format!("templates: {}", err)))?;
		let mut middleware = MiddlewareRegistry::with_builtins();
		middleware.register_default::<AuthenticationMiddleware>(AuthenticationMiddleware::IDENTIFIER);

		Ok(Self {
			middleware,
			symbols: SymbolRegistry::new(),
			urlconfs: UrlConfRegistry::new(),
			auth_backends: AuthBackendRegistry::new(),
			renderer: Arc::new(renderer),
			translations: Arc::new(StaticLoader::new()),
			mailer: Arc::new(AdminMailer::new(Arc::new(ConsoleBackend), Vec::new())),
			error_reporter: None,
			hooks: RequestHooks::default(),
		})
	}

	/// [`Components::new`] with admin mail addressed to `settings.admins`.
	pub fn for_settings(settings: &Settings) -> Result<Self> {
		let mailer = AdminMailer::new(Arc::new(ConsoleBackend), settings.admins.clone());
		Ok(Self::new()?.with_mailer(Arc::new(mailer)))
	}

	pub fn with_symbols(mut self, symbols: SymbolRegistry) -> Self {
		self.symbols = symbols;
		self
	}

	pub fn with_urlconfs(mut self, urlconfs: UrlConfRegistry) -> Self {
		self.urlconfs = urlconfs;
		self
	}

	pub fn with_middleware_registry(mut self, middleware: MiddlewareRegistry) -> Self {
		self.middleware = middleware;
		self
	}

	pub fn with_auth_backends(mut self, backends: AuthBackendRegistry) -> Self {
		self.auth_backends = backends;
		self
	}

	pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
		self.renderer = renderer;
		self
	}

	pub fn with_translations(mut self, loader: Arc<dyn TranslationLoader>) -> Self {
		self.translations = loader;
		self
	}

	pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
		self.mailer = mailer;
		self
	}

	pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
		self.error_reporter = Some(reporter);
		self
	}

	pub fn on_request_started<F>(mut self, hook: F) -> Self
	where
		F: Fn(&RequestContext) + Send + Sync + 'static,
	{
		self.hooks.on_request_started(hook);
		self
	}

	pub fn on_request_finished<F>(mut self, hook: F) -> Self
	where
		F: Fn(&RequestContext) + Send + Sync + 'static,
	{
		self.hooks.on_request_finished(hook);
		self
	}
}
