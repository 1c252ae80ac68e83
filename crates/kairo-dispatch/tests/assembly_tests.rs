//! Building the route table from installed apps, authentication and
//! sub-application mounting.

use async_trait::async_trait;
use http::StatusCode;
use kairo_conf::Settings;
use kairo_dispatch::{
	Application, AuthBackend, AuthUser, AuthenticationMiddleware, Components, Handler, UrlConf,
	UrlConfRegistry, get_application, request_user,
};
use kairo_exception::{Error, Result};
use kairo_http::{Request, Response};
use kairo_urls::Rule;
use kairo_views::{RouteGroup, Symbol, SymbolRegistry, ViewGroup, ViewReference, view_fn};
use rstest::rstest;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

fn get(uri: &str) -> Request {
	Request::builder().uri(uri).build().unwrap()
}

fn echo(label: &'static str) -> ViewReference {
	ViewReference::direct(view_fn(move |request, _| {
		let body = format!("{}:{}{}", label, request.script_name, request.path());
		Box::pin(async move { Ok(Response::ok().with_body(body)) })
	}))
}

fn blog_group() -> Arc<dyn ViewGroup> {
	Arc::new(
		RouteGroup::new()
			.route(Rule::new("/", "index"), echo("blog index"))
			.route(Rule::new("/{slug}", "show"), echo("blog show")),
	)
}

#[rstest]
#[tokio::test]
async fn test_installed_apps_are_mounted_and_namespaced() {
	let urls = UrlConfRegistry::new()
		.with_module("site.blog.urls", UrlConf::view_groups([blog_group()]))
		.with_module(
			"site.wiki.urls",
			UrlConf::rules(
				|| vec![Rule::new("/", "wiki/index")],
				vec![("wiki/index".to_string(), echo("wiki"))],
			),
		);
	let settings = Settings::default()
		.with_app("site.blog")
		.with_app("site.wiki")
		.with_mount_point("site.wiki", Some("/docs"));
	let app = Application::new(settings, Components::new().unwrap().with_urlconfs(urls));

	app.init().await.unwrap();
	let map = app.url_map().unwrap();
	let endpoints: Vec<&str> = map.rules().map(|rule| rule.endpoint.as_str()).collect();
	assert_eq!(endpoints, vec!["blog/index", "blog/show", "wiki/index"]);

	let response = app.handle(get("/blog/hello")).await.unwrap();
	assert_eq!(response.body_text(), "blog show:/blog/hello");
	let response = app.handle(get("/docs/")).await.unwrap();
	assert_eq!(response.body_text(), "wiki:/docs/");
}

#[rstest]
#[tokio::test]
async fn test_unmounted_app_is_skipped() {
	let mut urls = UrlConfRegistry::new();
	urls.register("site.blog.urls", UrlConf::view_groups([blog_group()]));
	urls.declare_mount_point("site.blog", None);
	let settings = Settings::default().with_app("site.blog");
	let app = Application::new(settings, Components::new().unwrap().with_urlconfs(urls));

	app.init().await.unwrap();
	assert!(app.url_map().unwrap().is_empty());
	let response = app.handle(get("/blog/")).await.unwrap();
	assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn test_root_url_module_name_is_tried_before_urls() {
	let urls = UrlConfRegistry::new()
		.with_module("site.blog.routes", UrlConf::view_groups([blog_group()]))
		.with_module(
			"site.blog.urls",
			UrlConf::rules(|| vec![Rule::new("/", "stale")], Vec::new()),
		);
	let mut settings = Settings::default().with_app("site.blog");
	settings.root_url_module = "routes".to_string();
	let app = Application::new(settings, Components::new().unwrap().with_urlconfs(urls));

	let response = app.handle(get("/blog/")).await.unwrap();
	assert_eq!(response.body_text(), "blog index:/blog/");
}

#[rstest]
#[tokio::test]
async fn test_missing_url_module_fails_startup() {
	let settings = Settings::default().with_app("site.ghost");
	let app = Application::new(settings, Components::new().unwrap());

	let err = app.handle(get("/")).await.unwrap_err();
	assert!(matches!(err, Error::ImproperlyConfigured(msg) if msg.contains("site.ghost.urls")));
	assert!(app.url_map().is_none());
}

#[rstest]
#[tokio::test]
async fn test_failed_route_build_is_retried() {
	let broken = Arc::new(AtomicBool::new(true));
	let calls = Arc::new(AtomicUsize::new(0));
	let (flag, counter) = (Arc::clone(&broken), Arc::clone(&calls));
	let urls = UrlConfRegistry::new().with_module(
		"site.urls",
		UrlConf::rules(
			move || {
				counter.fetch_add(1, Ordering::SeqCst);
				let path = if flag.load(Ordering::SeqCst) { "no-slash" } else { "/" };
				vec![Rule::new(path, "index")]
			},
			vec![("index".to_string(), echo("index"))],
		),
	);
	let settings = Settings::default()
		.with_app("site")
		.with_mount_point("site", Some("/"));
	let app = Application::new(settings, Components::new().unwrap().with_urlconfs(urls));

	assert!(app.handle(get("/")).await.is_err());
	broken.store(false, Ordering::SeqCst);
	let response = app.handle(get("/")).await.unwrap();
	assert_eq!(response.status, StatusCode::OK);
	app.handle(get("/")).await.unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test]
async fn test_construct_reference_instantiates_per_request() {
	let constructed = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&constructed);
	let mut symbols = SymbolRegistry::new();
	symbols.register_class(
		"site.views.Greeting",
		move |args: &[Value], kwargs: &Map<String, Value>| {
			counter.fetch_add(1, Ordering::SeqCst);
			let greeting = format!(
				"{} {}",
				args.first().and_then(Value::as_str).unwrap_or("hi"),
				kwargs.get("name").and_then(Value::as_str).unwrap_or("you"),
			);
			Ok::<_, anyhow::Error>(Symbol::View(view_fn(move |_, _| {
				let body = greeting.clone();
				Box::pin(async move { Ok(Response::ok().with_body(body)) })
			})))
		},
	);
	let mut kwargs = Map::new();
	kwargs.insert("name".into(), json!("Kairo"));
	let urls = UrlConfRegistry::new().with_module(
		"site.urls",
		UrlConf::rules(
			|| vec![Rule::new("/", "greet")],
			vec![(
				"greet".to_string(),
				ViewReference::construct("site.views.Greeting", vec![json!("hello")], kwargs),
			)],
		),
	);
	let settings = Settings::default()
		.with_app("site")
		.with_mount_point("site", Some("/"));
	let components = Components::new()
		.unwrap()
		.with_urlconfs(urls)
		.with_symbols(symbols);
	let app = Application::new(settings, components);

	for _ in 0..2 {
		let response = app.handle(get("/")).await.unwrap();
		assert_eq!(response.body_text(), "hello Kairo");
	}
	assert_eq!(constructed.load(Ordering::SeqCst), 2);
}

struct HeaderBackend;

#[async_trait]
impl AuthBackend for HeaderBackend {
	async fn get_user(&self, request: &Request) -> Result<Option<AuthUser>> {
		Ok(request
			.headers
			.get("x-user")
			.and_then(|value| value.to_str().ok())
			.map(|name| AuthUser::new("1", name)))
	}
}

fn auth_app(backend: Option<&str>) -> Application {
	let whoami = ViewReference::direct(view_fn(|request, _| {
		let body = match request_user(request) {
			Some(user) if user.is_anonymous() => "anonymous".to_string(),
			Some(user) => user.username.clone(),
			None => "unauthenticated".to_string(),
		};
		Box::pin(async move { Ok(Response::ok().with_body(body)) })
	}));
	let urls = UrlConfRegistry::new().with_module(
		"site.urls",
		UrlConf::rules(
			|| vec![Rule::new("/me", "me")],
			vec![("me".to_string(), whoami)],
		),
	);
	let mut settings = Settings::default()
		.with_app("site")
		.with_mount_point("site", Some("/"))
		.with_middleware(AuthenticationMiddleware::IDENTIFIER);
	settings.auth_user_backend = backend.map(str::to_string);

	let mut components = Components::new().unwrap().with_urlconfs(urls);
	components
		.auth_backends
		.register("site.auth.HeaderBackend", || Ok(Arc::new(HeaderBackend) as Arc<dyn AuthBackend>));
	Application::new(settings, components)
}

#[rstest]
#[case(Some("alice"), "alice")]
#[case(None, "anonymous")]
#[tokio::test]
async fn test_authentication_middleware_attaches_user(
	#[case] header: Option<&str>,
	#[case] expected: &str,
) {
	let app = auth_app(Some("site.auth.HeaderBackend"));
	let mut builder = Request::builder().uri("/me");
	if let Some(header) = header {
		builder = builder.header("x-user", header);
	}
	let response = app.handle(builder.build().unwrap()).await.unwrap();
	assert_eq!(response.body_text(), expected);
}

#[rstest]
#[case(None)]
#[case(Some("site.auth.Unknown"))]
#[tokio::test]
async fn test_unresolvable_auth_backend_fails_startup(#[case] backend: Option<&str>) {
	let app = auth_app(backend);
	let err = app.init().await.unwrap_err();
	assert!(matches!(err, Error::ImproperlyConfigured(_)));
}

#[rstest]
#[tokio::test]
async fn test_submounted_applications_receive_stripped_paths() {
	let root_urls = UrlConfRegistry::new().with_module(
		"site.urls",
		UrlConf::rules(
			|| vec![Rule::new("/", "index")],
			vec![("index".to_string(), echo("root"))],
		),
	);
	let mut settings = Settings::default()
		.with_app("site")
		.with_mount_point("site", Some("/"));
	settings.submount_apps = vec!["admin".to_string()];
	let components = Components::new().unwrap().with_urlconfs(root_urls);

	let dispatcher = get_application(settings, components, |name| {
		let urls = UrlConfRegistry::new().with_module(
			format!("{}.urls", name),
			UrlConf::rules(
				|| vec![Rule::new("/users/", "users")],
				vec![("users".to_string(), echo("admin users"))],
			),
		);
		let settings = Settings::default()
			.with_app_name(name)
			.with_app(name)
			.with_mount_point(name, Some("/"));
		Ok(Application::new(settings, Components::new()?.with_urlconfs(urls)))
	})
	.unwrap();

	let response = dispatcher.handle(get("/")).await.unwrap();
	assert_eq!(response.body_text(), "root:/");

	let response = dispatcher.handle(get("/admin/users/")).await.unwrap();
	assert_eq!(response.body_text(), "admin users:/admin/users/");

	let request = Request::builder()
		.uri("/admin/users?page=3")
		.header("host", "example.com")
		.build()
		.unwrap();
	let response = dispatcher.handle(request).await.unwrap();
	assert_eq!(response.status, StatusCode::MOVED_PERMANENTLY);
	assert_eq!(
		response.headers["location"],
		"http://example.com/admin/users/?page=3"
	);
}
