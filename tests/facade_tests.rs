//! The facade wires every crate together through its prelude.

use async_trait::async_trait;
use http::StatusCode;
use kairo::prelude::*;
use rstest::rstest;
use std::sync::Arc;

struct PoweredBy;

#[async_trait]
impl Middleware for PoweredBy {
	fn hooks(&self) -> HookSet {
		HookSet::NONE.response()
	}

	async fn process_response(&self, _request: &Request, response: Response) -> Result<Response> {
		Ok(response.with_header("x-powered-by", "kairo"))
	}
}

fn blog() -> Arc<dyn ViewGroup> {
	let index = view_fn(|_, _| {
		let mut params = ViewParams::new();
		params.insert("slug".to_string(), ParamValue::from("first-post"));
		let response = url_for("blog/show", &params, false).map(|link| Response::ok().with_body(link));
		Box::pin(async move { response })
	});
	let show = view_fn(|_, params| {
		let slug = params
			.get("slug")
			.and_then(ParamValue::as_str)
			.unwrap_or_default()
			.to_string();
		Box::pin(async move { Ok(Response::ok().with_body(slug)) })
	});
	Arc::new(
		RouteGroup::new()
			.route(Rule::new("/", "index"), ViewReference::direct(index))
			.route(Rule::new("/{slug}", "show"), ViewReference::direct(show)),
	)
}

fn application() -> Application {
	let urls = UrlConfRegistry::new().with_module("site.blog.urls", UrlConf::view_groups([blog()]));
	let mut components = Components::new().unwrap().with_urlconfs(urls);
	components
		.middleware
		.register("site.middleware.PoweredBy", || Ok(Arc::new(PoweredBy) as Arc<dyn Middleware>));
	let settings = Settings::default()
		.with_app("site.blog")
		.with_middleware("site.middleware.PoweredBy");
	Application::new(settings, components)
}

#[rstest]
#[case("/blog/", "/blog/first-post")]
#[case("/blog/first-post", "first-post")]
#[tokio::test]
async fn test_application_serves_through_facade(#[case] path: &str, #[case] body: &str) {
	let app = application();
	let response = app
		.handle(Request::builder().uri(path).build().unwrap())
		.await
		.unwrap();
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body_text(), body);
	assert_eq!(response.headers["x-powered-by"], "kairo");
}

#[rstest]
#[tokio::test]
async fn test_dispatcher_mounts_application() {
	let dispatcher = Dispatcher::new(Arc::new(application()));
	let response = dispatcher
		.handle(Request::builder().uri("/nowhere").build().unwrap())
		.await
		.unwrap();
	assert_eq!(response.status, StatusCode::NOT_FOUND);
	assert_eq!(response.headers["x-powered-by"], "kairo");
}

#[rstest]
fn test_logging_init_is_idempotent() {
	kairo::logging::init();
	assert!(!kairo::logging::init_with("debug"));
}
