use async_trait::async_trait;
use http::StatusCode;
use kairo_exception::{Error, Result};
use kairo_http::{Request, Response};
use kairo_middleware::{
	HookSet, LoggingMiddleware, Middleware, MiddlewareOutcome, MiddlewarePipeline,
	MiddlewareRegistry,
};
use kairo_urls::ViewParams;
use kairo_views::{View, view_fn};
use parking_lot::Mutex;
use rstest::{fixture, rstest};
use std::sync::Arc;

type Journal = Arc<Mutex<Vec<String>>>;

/// Records every hook call; optionally answers from one phase.
struct Recorder {
	name: &'static str,
	hooks: HookSet,
	respond_in: Option<&'static str>,
	journal: Journal,
}

impl Recorder {
	fn outcome(&self, phase: &str) -> MiddlewareOutcome {
		self.journal.lock().push(format!("{}:{}", self.name, phase));
		if self.respond_in == Some(phase) {
			MiddlewareOutcome::Respond(Response::ok().with_body(format!("{}:{}", self.name, phase)))
		} else {
			MiddlewareOutcome::Continue
		}
	}
}

#[async_trait]
impl Middleware for Recorder {
	fn hooks(&self) -> HookSet {
		self.hooks
	}

	async fn process_request(&self, _request: &mut Request) -> Result<MiddlewareOutcome> {
		Ok(self.outcome("request"))
	}

	async fn process_view(
		&self,
		_request: &mut Request,
		_endpoint: &str,
		_view: &Arc<dyn View>,
		_params: &ViewParams,
	) -> Result<MiddlewareOutcome> {
		Ok(self.outcome("view"))
	}

	async fn process_response(&self, _request: &Request, response: Response) -> Result<Response> {
		self.journal.lock().push(format!("{}:response", self.name));
		Ok(response)
	}

	async fn process_exception(&self, _request: &Request, _error: &Error) -> Result<MiddlewareOutcome> {
		Ok(self.outcome("exception"))
	}
}

fn register(
	registry: &mut MiddlewareRegistry,
	name: &'static str,
	hooks: HookSet,
	respond_in: Option<&'static str>,
	journal: &Journal,
) {
	let journal = Arc::clone(journal);
	registry.register(name, move || {
		Ok(Arc::new(Recorder {
			name,
			hooks,
			respond_in,
			journal: Arc::clone(&journal),
		}) as Arc<dyn Middleware>)
	});
}

fn ids(names: &[&str]) -> Vec<String> {
	names.iter().map(|n| n.to_string()).collect()
}

#[fixture]
fn journal() -> Journal {
	Arc::new(Mutex::new(Vec::new()))
}

#[fixture]
fn request() -> Request {
	Request::builder().uri("/").build().unwrap()
}

#[rstest]
fn test_hook_lists_follow_declaration_order(journal: Journal) {
	let mut registry = MiddlewareRegistry::new();
	register(&mut registry, "a", HookSet::ALL, None, &journal);
	register(&mut registry, "b", HookSet::NONE.request().response(), None, &journal);
	register(&mut registry, "c", HookSet::NONE.view().exception(), None, &journal);

	let pipeline = MiddlewarePipeline::build(&ids(&["a", "b", "c"]), &registry).unwrap();

	assert_eq!(pipeline.request_ids(), vec!["a", "b"]);
	assert_eq!(pipeline.view_ids(), vec!["a", "c"]);
	assert_eq!(pipeline.response_ids(), vec!["b", "a"]);
	assert_eq!(pipeline.exception_ids(), vec!["c", "a"]);
}

#[rstest]
fn test_not_used_middleware_is_skipped(journal: Journal) {
	let mut registry = MiddlewareRegistry::new();
	register(&mut registry, "a", HookSet::ALL, None, &journal);
	registry.register("off", || Err(Error::MiddlewareNotUsed));

	let pipeline = MiddlewarePipeline::build(&ids(&["off", "a"]), &registry).unwrap();

	assert!(!pipeline.contains("off"));
	assert_eq!(pipeline.request_ids(), vec!["a"]);
}

#[rstest]
fn test_failing_factory_is_improperly_configured() {
	let mut registry = MiddlewareRegistry::new();
	registry.register("broken", || Err(Error::Internal("no database".into())));

	let err = MiddlewarePipeline::build(&ids(&["broken"]), &registry).unwrap_err();

	assert!(matches!(err, Error::ImproperlyConfigured(ref msg) if msg.contains("broken")));
}

#[rstest]
fn test_unknown_identifier_is_improperly_configured() {
	let registry = MiddlewareRegistry::with_builtins();
	let err = MiddlewarePipeline::build(&ids(&["site.Nope"]), &registry).unwrap_err();
	assert!(matches!(err, Error::ImproperlyConfigured(_)));
}

#[rstest]
#[tokio::test]
async fn test_request_short_circuit_stops_later_hooks(journal: Journal, mut request: Request) {
	let mut registry = MiddlewareRegistry::new();
	register(&mut registry, "a", HookSet::ALL, None, &journal);
	register(&mut registry, "b", HookSet::ALL, Some("request"), &journal);
	register(&mut registry, "c", HookSet::ALL, None, &journal);
	let pipeline = MiddlewarePipeline::build(&ids(&["a", "b", "c"]), &registry).unwrap();

	let response = pipeline.run_request(&mut request).await.unwrap().unwrap();
	pipeline.run_response(&request, response).await.unwrap();

	assert_eq!(
		*journal.lock(),
		vec!["a:request", "b:request", "c:response", "b:response", "a:response"]
	);
}

#[rstest]
#[tokio::test]
async fn test_view_hook_short_circuit(journal: Journal, mut request: Request) {
	let mut registry = MiddlewareRegistry::new();
	register(&mut registry, "a", HookSet::ALL, Some("view"), &journal);
	register(&mut registry, "b", HookSet::ALL, None, &journal);
	let pipeline = MiddlewarePipeline::build(&ids(&["a", "b"]), &registry).unwrap();
	let view = view_fn(|_, _| Box::pin(async { Ok(Response::ok()) }));

	let response = pipeline
		.run_view(&mut request, "index", &view, &ViewParams::new())
		.await
		.unwrap()
		.unwrap();

	assert_eq!(response.body_text(), "a:view");
	assert_eq!(*journal.lock(), vec!["a:view"]);
}

#[rstest]
#[tokio::test]
async fn test_first_exception_response_wins(journal: Journal, request: Request) {
	let mut registry = MiddlewareRegistry::new();
	register(&mut registry, "a", HookSet::ALL, Some("exception"), &journal);
	register(&mut registry, "b", HookSet::ALL, Some("exception"), &journal);
	let pipeline = MiddlewarePipeline::build(&ids(&["a", "b"]), &registry).unwrap();

	let response = pipeline
		.run_exception(&request, &Error::Internal("boom".into()))
		.await
		.unwrap()
		.unwrap();

	assert_eq!(response.body_text(), "b:exception");
	assert_eq!(*journal.lock(), vec!["b:exception"]);
}

#[rstest]
#[tokio::test]
async fn test_logging_middleware_passes_response_through(mut request: Request) {
	let registry = MiddlewareRegistry::with_builtins();
	let pipeline = MiddlewarePipeline::build(
		&ids(&[LoggingMiddleware::IDENTIFIER]),
		&registry,
	)
	.unwrap();

	assert!(pipeline.run_request(&mut request).await.unwrap().is_none());
	let response = pipeline
		.run_response(&request, Response::new(StatusCode::ACCEPTED))
		.await
		.unwrap();

	assert_eq!(response.status, StatusCode::ACCEPTED);
}
