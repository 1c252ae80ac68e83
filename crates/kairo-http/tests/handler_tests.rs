use async_trait::async_trait;
use http::{Method, StatusCode};
use kairo_http::{Handler, Request, Response};
use rstest::rstest;
use std::sync::Arc;

struct Echo;

#[async_trait]
impl Handler for Echo {
	async fn handle(&self, request: Request) -> kairo_http::Result<Response> {
		Ok(Response::ok().with_body(format!("{} {}", request.method, request.path())))
	}
}

#[rstest]
#[tokio::test]
async fn test_arc_handler_delegates() {
	let handler: Arc<dyn Handler> = Arc::new(Echo);
	let request = Request::builder()
		.method(Method::PUT)
		.uri("/items/7")
		.build()
		.unwrap();

	let response = handler.handle(request).await.unwrap();

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body_text(), "PUT /items/7");
}
