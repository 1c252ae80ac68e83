//! # Kairo Dispatch
//!
//! The application request lifecycle: route resolution, the four
//! middleware phases, view invocation and the translation of every
//! failure into a response.
//!
//! ## Architecture
//!
//! ```text
//! Request → Dispatcher → Application → route table → request middleware
//!                             │                              ↓
//!                      RequestContext              view resolution → view middleware → view
//!                   (task-local, torn down                                              ↓
//!                    on every exit path)     response middleware ← failure translation ←┘
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use kairo_conf::Settings;
//! use kairo_dispatch::{Application, Components, Handler, UrlConf, UrlConfRegistry};
//! use kairo_http::{Request, Response};
//! use kairo_urls::Rule;
//! use kairo_views::{ViewReference, view_fn};
//! use http::StatusCode;
//!
//! # tokio_test::block_on(async {
//! let hello = view_fn(|_, _| Box::pin(async { Ok(Response::ok().with_body("Hello")) }));
//! let urls = UrlConfRegistry::new().with_module(
//!     "site.urls",
//!     UrlConf::rules(
//!         || vec![Rule::new("/", "index")],
//!         vec![("index".to_string(), ViewReference::direct(hello.clone()))],
//!     ),
//! );
//!
//! let settings = Settings::default().with_app("site").with_mount_point("site", Some("/"));
//! let app = Application::new(settings, Components::new().unwrap().with_urlconfs(urls));
//!
//! let response = app.handle(Request::builder().uri("/").build().unwrap()).await.unwrap();
//! assert_eq!(response.body_text(), "Hello");
//!
//! let missing = app.handle(Request::builder().uri("/nope").build().unwrap()).await.unwrap();
//! assert_eq!(missing.status, StatusCode::NOT_FOUND);
//! # });
//! ```

pub mod application;
pub mod auth;
pub mod components;
pub mod context;
pub mod dispatcher;
pub mod exception;
mod handler;
pub mod urlconf;

pub use application::Application;
pub use auth::{
	AuthBackend, AuthBackendFactory, AuthBackendRegistry, AuthUser, AuthenticationMiddleware,
	request_user,
};
pub use components::{Components, ErrorReporter};
pub use context::{ContextHook, RequestContext, RequestHooks, current, gettext, url_for};
pub use dispatcher::{Dispatcher, get_application};
pub use exception::{MAINTENANCE_MESSAGE, format_trace, render_error};
pub use handler::{MarketplaceDomain, marketplace_domain};
pub use kairo_http::Handler;
pub use urlconf::{MakeRules, UrlConf, UrlConfRegistry, app_tail_name, mount_point};
