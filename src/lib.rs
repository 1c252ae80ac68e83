//! # Kairo
//!
//! A request-dispatching web application core. An [`Application`] turns
//! each incoming [`Request`] into exactly one [`Response`]:
//!
//! - URL routing over the rules of every installed app, each mounted under
//!   its own path prefix
//! - a four-phase middleware pipeline (request, view, response, exception)
//! - lazily resolved views
//! - translation of every failure into a redirect, an error page, a
//!   maintenance page or an administrator notification
//!
//! ## Crates
//!
//! | Module | Crate | Contents |
//! |--------|-------|----------|
//! | [`conf`] | `kairo-conf` | [`Settings`] loaded from TOML and the environment |
//! | [`exception`] | `kairo-exception` | [`Error`], [`HttpError`] |
//! | [`http`] | `kairo-http` | [`Request`], [`Response`], [`Handler`] |
//! | [`urls`] | `kairo-urls` | [`Rule`], [`UrlMap`], URL building |
//! | [`views`] | `kairo-views` | views, view references and view groups |
//! | [`middleware`] | `kairo-middleware` | the [`Middleware`] trait and pipeline |
//! | [`i18n`] | `kairo-i18n` | catalogs and language negotiation |
//! | [`template`] | `kairo-template` | error and maintenance page rendering |
//! | [`mail`] | `kairo-mail` | administrator notifications |
//! | [`dispatch`] | `kairo-dispatch` | [`Application`], [`Dispatcher`] |
//! | `server` | `kairo-server` | hyper HTTP/1.1 server (feature `server`) |
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use kairo::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! kairo::logging::init();
//!
//! let hello = view_fn(|_, _| Box::pin(async { Ok(Response::ok().with_body("Hello")) }));
//! let urls = UrlConfRegistry::new().with_module(
//!     "site.urls",
//!     UrlConf::rules(
//!         || vec![Rule::new("/", "index")],
//!         vec![("index".to_string(), ViewReference::direct(hello))],
//!     ),
//! );
//!
//! let settings = Settings::from_file("kairo.toml")?.with_env_overrides()?;
//! let components = Components::for_settings(&settings)?.with_urlconfs(urls);
//! let application = Application::new(settings, components);
//!
//! let addr = "127.0.0.1:8000".parse()?;
//! kairo::server::serve_with_shutdown(addr, Arc::new(application), kairo::server::shutdown_signal())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod logging;

pub use kairo_conf as conf;
pub use kairo_dispatch as dispatch;
pub use kairo_exception as exception;
pub use kairo_http as http;
pub use kairo_i18n as i18n;
pub use kairo_mail as mail;
pub use kairo_middleware as middleware;
#[cfg(feature = "server")]
pub use kairo_server as server;
pub use kairo_template as template;
pub use kairo_urls as urls;
pub use kairo_views as views;

pub use kairo_conf::{Settings, SettingsError};
pub use kairo_dispatch::{
	Application, Components, Dispatcher, ErrorReporter, RequestContext, UrlConf, UrlConfRegistry,
	get_application,
};
pub use kairo_exception::{Error, HttpError, Result};
pub use kairo_http::{Handler, Request, Response};
pub use kairo_middleware::{Middleware, MiddlewareOutcome, MiddlewareRegistry};
pub use kairo_urls::{Rule, UrlMap, ViewParams};
pub use kairo_views::{View, ViewGroup, ViewReference};

/// Everything needed to declare URLs, views and middleware.
pub mod prelude {
	pub use kairo_conf::Settings;
	pub use kairo_dispatch::{
		Application, AuthBackend, AuthUser, Components, Dispatcher, Handler, UrlConf,
		UrlConfRegistry, gettext, marketplace_domain, request_user, url_for,
	};
	pub use kairo_exception::{Error, HttpError, Result};
	pub use kairo_http::{Request, Response};
	pub use kairo_middleware::{HookSet, Middleware, MiddlewareOutcome};
	pub use kairo_urls::{ParamValue, Rule, ViewParams, submount};
	pub use kairo_views::{RouteGroup, View, ViewGroup, ViewReference, view_fn};
}
