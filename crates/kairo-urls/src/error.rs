use http::Method;
use kairo_exception::{Error, HttpError};
use thiserror::Error;

/// Errors raised while compiling patterns or building URLs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
	#[error("Pattern `{0}` must start with a slash")]
	MissingLeadingSlash(String),

	#[error("Pattern length {length} exceeds maximum allowed length of {max} bytes")]
	PatternTooLong { length: usize, max: usize },

	#[error("Pattern has {count} path segments, exceeding maximum of {max}")]
	TooManySegments { count: usize, max: usize },

	#[error("Unterminated parameter in pattern `{0}`")]
	UnterminatedParameter(String),

	#[error("Invalid parameter name `{0}`")]
	InvalidParameterName(String),

	#[error("Parameter `{0}` appears more than once")]
	DuplicateParameter(String),

	#[error("Unknown converter `{0}`")]
	UnknownConverter(String),

	#[error("Failed to compile pattern regex: {0}")]
	Regex(String),

	#[error("Could not build url for endpoint `{endpoint}`")]
	Build { endpoint: String },
}

/// Outcome of a failed route match
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
	/// The URL is not canonical; the client should be sent to `new_url`
	#[error("Request redirect to {new_url}")]
	RequestRedirect { new_url: String },

	#[error("No rule matches the requested URL")]
	NotFound,

	/// A rule matched the path but not the method
	#[error("Method not allowed")]
	MethodNotAllowed { allowed: Vec<Method> },
}

impl From<RoutingError> for Error {
	fn from(err: RoutingError) -> Self {
		match err {
			RoutingError::RequestRedirect { new_url } => Error::Redirect(new_url),
			RoutingError::NotFound => Error::Http(HttpError::not_found()),
			RoutingError::MethodNotAllowed { allowed } => {
				Error::Http(HttpError::method_not_allowed(allowed))
			}
		}
	}
}

impl From<UrlError> for Error {
	fn from(err: UrlError) -> Self {
		Error::ImproperlyConfigured(err.to_string())
	}
}

pub type Result<T> = std::result::Result<T, UrlError>;
