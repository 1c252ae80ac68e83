//! End-to-end requests over a real TCP connection.

use async_trait::async_trait;
use kairo_exception::{Error, Result};
use kairo_http::{Handler, Request, Response};
use kairo_server::{HttpServer, ServerError, ServerResult};
use rstest::rstest;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

struct Echo;

#[async_trait]
impl Handler for Echo {
	async fn handle(&self, request: Request) -> Result<Response> {
		match request.path() {
			"/fail" => return Err(Error::Internal("boom".to_string())),
			"/exit" => return Err(Error::Exit(3)),
			_ => {}
		}
		let body = format!(
			"{} {} peer={} body={}",
			request.method,
			request.path(),
			request.remote_addr.is_some(),
			String::from_utf8_lossy(&request.body),
		);
		Ok(Response::ok().with_body(body).with_header("x-served-by", "kairo"))
	}
}

async fn start() -> (
	SocketAddr,
	oneshot::Sender<()>,
	tokio::task::JoinHandle<ServerResult<()>>,
) {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	let (tx, rx) = oneshot::channel::<()>();
	let task = tokio::spawn(async move {
		HttpServer::new(Arc::new(Echo))
			.serve_listener(listener, async {
				let _ = rx.await;
			})
			.await
	});
	(addr, tx, task)
}

async fn roundtrip(addr: SocketAddr, raw: &str) -> String {
	let mut stream = TcpStream::connect(addr).await.unwrap();
	stream.write_all(raw.as_bytes()).await.unwrap();
	let mut buf = Vec::new();
	stream.read_to_end(&mut buf).await.unwrap();
	String::from_utf8(buf).unwrap()
}

#[rstest]
#[tokio::test]
async fn test_request_reaches_handler() {
	let (addr, shutdown, task) = start().await;

	let response = roundtrip(
		addr,
		"POST /submit?x=1 HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello",
	)
	.await;

	assert!(response.starts_with("HTTP/1.1 200 OK"));
	assert!(response.to_ascii_lowercase().contains("x-served-by: kairo"));
	assert!(response.ends_with("POST /submit peer=true body=hello"));

	shutdown.send(()).unwrap();
	task.await.unwrap().unwrap();
}

#[rstest]
#[tokio::test]
async fn test_handler_error_becomes_500() {
	let (addr, shutdown, task) = start().await;

	let response = roundtrip(
		addr,
		"GET /fail HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
	)
	.await;
	assert!(response.starts_with("HTTP/1.1 500 Internal Server Error"));

	shutdown.send(()).unwrap();
	task.await.unwrap().unwrap();
}

#[rstest]
#[tokio::test]
async fn test_shutdown_stops_accepting() {
	let (addr, shutdown, task) = start().await;
	shutdown.send(()).unwrap();
	task.await.unwrap().unwrap();

	assert!(TcpStream::connect(addr).await.is_err());
}

#[rstest]
#[tokio::test]
async fn test_exit_stops_server_without_response() {
	let (addr, _shutdown, task) = start().await;

	let mut stream = TcpStream::connect(addr).await.unwrap();
	stream
		.write_all(b"GET /exit HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
		.await
		.unwrap();
	let mut buf = Vec::new();
	// The connection is dropped unanswered; a reset is as good as EOF.
	let _ = stream.read_to_end(&mut buf).await;
	assert!(!String::from_utf8_lossy(&buf).contains("500 Internal Server Error"));

	let result = task.await.unwrap();
	assert!(matches!(result, Err(ServerError::Exit(3))));
	assert!(TcpStream::connect(addr).await.is_err());
}
