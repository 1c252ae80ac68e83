use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use kairo_exception::Error;
use kairo_http::{Handler, Request, Response};
use std::future::{self, Future};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Errors that stop the server or a single connection.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
	#[error("connection error: {0}")]
	Connection(#[from] hyper::Error),
	/// A handler asked for the process to terminate with this status
	#[error("process exit requested with status {0}")]
	Exit(i32),
}

pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// HTTP/1.1 server delegating every request to one [`Handler`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use kairo_server::HttpServer;
/// use kairo_exception::Error;
/// use kairo_http::{Handler, Request, Response};
///
/// struct Hello;
///
/// #[async_trait::async_trait]
/// impl Handler for Hello {
///     async fn handle(&self, _req: Request) -> kairo_exception::Result<Response> {
///         Ok(Response::ok().with_body("Hello"))
///     }
/// }
///
/// let server = HttpServer::new(Arc::new(Hello));
/// # let _ = server.handler();
/// ```
pub struct HttpServer {
	handler: Arc<dyn Handler>,
}

impl HttpServer {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self { handler }
	}

	pub fn handler(&self) -> Arc<dyn Handler> {
		Arc::clone(&self.handler)
	}

	/// Bind `addr` and serve until an accept error occurs.
	pub async fn listen(self, addr: SocketAddr) -> ServerResult<()> {
		self.listen_with_shutdown(addr, future::pending()).await
	}

	/// Bind `addr` and serve until `signal` resolves.
	pub async fn listen_with_shutdown<F>(self, addr: SocketAddr, signal: F) -> ServerResult<()>
	where
		F: Future<Output = ()>,
	{
		let listener = TcpListener::bind(addr).await?;
		self.serve_listener(listener, signal).await
	}

	/// Accept connections from an already bound listener until `signal`
	/// resolves. Connections in flight keep running on their own tasks.
	///
	/// A handler returning [`Error::Exit`] stops the loop with
	/// [`ServerError::Exit`] so the host can terminate with that status.
	pub async fn serve_listener<F>(self, listener: TcpListener, signal: F) -> ServerResult<()>
	where
		F: Future<Output = ()>,
	{
		if let Ok(local) = listener.local_addr() {
			tracing::info!(addr = %local, "server listening");
		}
		tokio::pin!(signal);
		let (exit_tx, mut exit_rx) = mpsc::unbounded_channel();

		loop {
			tokio::select! {
				result = listener.accept() => {
					let (stream, socket_addr) = result?;
					let handler = Arc::clone(&self.handler);
					let exit = exit_tx.clone();
					tokio::task::spawn(async move {
						if let Err(err) = Self::handle_connection(stream, socket_addr, handler, exit).await {
							tracing::debug!(peer = %socket_addr, error = %err, "connection closed with error");
						}
					});
				}
				Some(code) = exit_rx.recv() => {
					tracing::warn!(code, "exit requested, no longer accepting connections");
					return Err(ServerError::Exit(code));
				}
				_ = &mut signal => {
					tracing::info!("shutdown signal received, no longer accepting connections");
					break;
				}
			}
		}
		Ok(())
	}

	/// Serve HTTP/1.1 requests arriving on one connection. Exit requests
	/// are forwarded to `exit` and the connection is dropped unanswered.
	pub async fn handle_connection(
		stream: TcpStream,
		socket_addr: SocketAddr,
		handler: Arc<dyn Handler>,
		exit: mpsc::UnboundedSender<i32>,
	) -> ServerResult<()> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr: socket_addr,
			exit,
		};

		http1::Builder::new().serve_connection(io, service).await?;
		Ok(())
	}
}

struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
	exit: mpsc::UnboundedSender<i32>,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = Box<dyn std::error::Error + Send + Sync>;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = Arc::clone(&self.handler);
		let remote_addr = self.remote_addr;
		let exit = self.exit.clone();

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body = body.collect().await?.to_bytes();

			let mut request = Request::new(parts.method, parts.uri, parts.version, parts.headers, body);
			request.remote_addr = Some(remote_addr);

			let response = match handler.handle(request).await {
				Ok(response) => response,
				Err(Error::Exit(code)) => {
					// The receiver is gone only once the loop has stopped.
					let _ = exit.send(code);
					let err: Self::Error = Box::new(Error::Exit(code));
					return Err(err);
				}
				Err(err) => {
					tracing::error!(peer = %remote_addr, error = %err, "handler failed");
					Response::internal_server_error()
				}
			};
			Ok(into_hyper_response(response))
		})
	}
}

fn into_hyper_response(response: Response) -> hyper::Response<Full<Bytes>> {
	let mut converted = hyper::Response::new(Full::new(response.body));
	*converted.status_mut() = response.status;
	*converted.headers_mut() = response.headers;
	converted
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %err, "failed to listen for shutdown signal");
		future::pending::<()>().await;
	}
}

/// Serve `handler` on `addr` until an accept error occurs.
pub async fn serve(addr: SocketAddr, handler: Arc<dyn Handler>) -> ServerResult<()> {
	HttpServer::new(handler).listen(addr).await
}

/// Serve `handler` on `addr` until `signal` resolves.
pub async fn serve_with_shutdown<F>(
	addr: SocketAddr,
	handler: Arc<dyn Handler>,
	signal: F,
) -> ServerResult<()>
where
	F: Future<Output = ()>,
{
	HttpServer::new(handler).listen_with_shutdown(addr, signal).await
}
