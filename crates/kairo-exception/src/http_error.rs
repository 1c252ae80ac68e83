//! HTTP-level errors raised deliberately by routing, middleware or views.

use http::StatusCode;
use std::fmt;
use std::sync::Arc;

type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// An HTTP error with a status code, an optional human readable
/// description and an optional underlying cause.
#[derive(Clone)]
pub struct HttpError {
	status: StatusCode,
	description: Option<String>,
	cause: Option<Cause>,
	allowed_methods: Vec<http::Method>,
}

impl HttpError {
	/// Create an error for the given status code.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_exception::HttpError;
	/// use http::StatusCode;
	///
	/// let err = HttpError::new(StatusCode::BAD_REQUEST);
	/// assert_eq!(err.status(), StatusCode::BAD_REQUEST);
	/// assert_eq!(err.name(), "Bad Request");
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			description: None,
			cause: None,
			allowed_methods: Vec::new(),
		}
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn forbidden() -> Self {
		Self::new(StatusCode::FORBIDDEN)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// 405 carrying the methods the matched URL accepts.
	pub fn method_not_allowed(allowed: Vec<http::Method>) -> Self {
		Self {
			allowed_methods: allowed,
			..Self::new(StatusCode::METHOD_NOT_ALLOWED)
		}
	}

	/// Attach a description shown on the error page.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Attach the error that caused this HTTP error.
	///
	/// The cause is also exposed through [`std::error::Error::source`].
	///
	/// # Examples
	///
	/// ```
	/// use kairo_exception::HttpError;
	/// use std::error::Error as _;
	///
	/// let io = std::io::Error::other("disk on fire");
	/// let err = HttpError::internal_server_error().with_cause(io);
	/// assert_eq!(err.source().unwrap().to_string(), "disk on fire");
	/// ```
	pub fn with_cause<E>(mut self, cause: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		if self.description.is_none() {
			self.description = Some(cause.to_string());
		}
		self.cause = Some(Arc::new(cause));
		self
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// Canonical reason phrase for the status code.
	pub fn name(&self) -> &'static str {
		self.status.canonical_reason().unwrap_or("Unknown Error")
	}

	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}

	pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
		self.cause.as_deref()
	}

	pub fn allowed_methods(&self) -> &[http::Method] {
		&self.allowed_methods
	}

	/// Plain HTML body used when no error template is available.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_exception::HttpError;
	///
	/// let body = HttpError::not_found().default_body();
	/// assert!(body.contains("<title>404 Not Found</title>"));
	/// ```
	pub fn default_body(&self) -> String {
		let description = self
			.description
			.as_deref()
			.unwrap_or_else(|| default_description(self.status));
		format!(
			"<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 3.2 Final//EN\">\n\
			 <title>{code} {name}</title>\n\
			 <h1>{name}</h1>\n\
			 <p>{description}</p>\n",
			code = self.status.as_u16(),
			name = self.name(),
			description = description,
		)
	}
}

fn default_description(status: StatusCode) -> &'static str {
	match status.as_u16() {
		400 => "The browser (or proxy) sent a request that this server could not understand.",
		403 => "You don't have the permission to access the requested resource.",
		404 => "The requested URL was not found on the server.",
		405 => "The method is not allowed for the requested URL.",
		503 => "The server is temporarily unable to service your request.",
		_ => {
			"The server encountered an internal error and was unable to complete your request."
		}
	}
}

impl fmt::Debug for HttpError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HttpError")
			.field("status", &self.status)
			.field("description", &self.description)
			.field("cause", &self.cause.as_ref().map(|c| c.to_string()))
			.finish()
	}
}

impl fmt::Display for HttpError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.status.as_u16(), self.name())?;
		if let Some(description) = &self.description {
			write!(f, ": {}", description)?;
		}
		Ok(())
	}
}

impl std::error::Error for HttpError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.cause
			.as_deref()
			.map(|c| c as &(dyn std::error::Error + 'static))
	}
}
