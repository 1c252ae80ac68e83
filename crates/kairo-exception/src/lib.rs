//! # Kairo Exception
//!
//! Error taxonomy for the Kairo request pipeline.
//!
//! Every stage of request handling (routing, middleware, view resolution,
//! view execution) reports failures through [`Error`]. The dispatch engine
//! later turns each variant into a response:
//!
//! | Variant | Outcome |
//! |---|---|
//! | [`Error::Redirect`] | redirect response |
//! | [`Error::Http`] | rendered error page for the status code |
//! | [`Error::CapabilityDisabled`] | 503 maintenance page |
//! | [`Error::Exit`] | propagated to the caller unmodified |
//! | everything else | uncaught-exception handler (500) |
//!
//! ## Examples
//!
//! ```
//! use kairo_exception::{Error, HttpError};
//! use http::StatusCode;
//!
//! let err: Error = HttpError::not_found().into();
//! assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
//! ```

mod http_error;

pub use http_error::HttpError;

use http::StatusCode;
use thiserror::Error;

/// Errors that can occur while handling a request
#[derive(Debug, Error)]
pub enum Error {
	/// The requested URL is not canonical; the client must be sent elsewhere
	#[error("Redirect required: {0}")]
	Redirect(String),

	/// A deliberate HTTP-level failure (4xx/5xx)
	#[error(transparent)]
	Http(#[from] HttpError),

	/// Misconfiguration detected while bringing the application up
	#[error("Improperly configured: {0}")]
	ImproperlyConfigured(String),

	/// Raised by a middleware factory that declines to participate
	#[error("Middleware not used")]
	MiddlewareNotUsed,

	/// A backing platform capability is temporarily unavailable
	#[error("Capability disabled: {0}")]
	CapabilityDisabled(String),

	/// Deliberate process termination; never converted into a response
	#[error("Process exit requested with status {0}")]
	Exit(i32),

	/// Internal failure described by a message
	#[error("Internal error: {0}")]
	Internal(String),

	/// Any other application error
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl Error {
	/// Status code a response for this error would carry.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_exception::Error;
	/// use http::StatusCode;
	///
	/// assert_eq!(
	///     Error::CapabilityDisabled("datastore".into()).status_code(),
	///     StatusCode::SERVICE_UNAVAILABLE
	/// );
	/// assert_eq!(
	///     Error::Internal("boom".into()).status_code(),
	///     StatusCode::INTERNAL_SERVER_ERROR
	/// );
	/// ```
	pub fn status_code(&self) -> StatusCode {
		match self {
			Error::Redirect(_) => StatusCode::MOVED_PERMANENTLY,
			Error::Http(err) => err.status(),
			Error::CapabilityDisabled(_) => StatusCode::SERVICE_UNAVAILABLE,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Returns `true` for the process-termination signal.
	pub fn is_exit(&self) -> bool {
		matches!(self, Error::Exit(_))
	}

	/// Shorthand for an HTTP 404 error.
	pub fn not_found(description: impl Into<String>) -> Self {
		Error::Http(HttpError::not_found().with_description(description))
	}
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Error::Redirect("/a/".into()), StatusCode::MOVED_PERMANENTLY)]
	#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
	#[case(Error::ImproperlyConfigured("x".into()), StatusCode::INTERNAL_SERVER_ERROR)]
	#[case(Error::Exit(0), StatusCode::INTERNAL_SERVER_ERROR)]
	#[case(
		Error::Other(anyhow::anyhow!("boom")),
		StatusCode::INTERNAL_SERVER_ERROR
	)]
	fn test_status_code(#[case] error: Error, #[case] expected: StatusCode) {
		assert_eq!(error.status_code(), expected);
	}

	#[test]
	fn test_http_error_display_is_transparent() {
		let err: Error = HttpError::new(StatusCode::FORBIDDEN).into();
		assert_eq!(err.to_string(), "403 Forbidden");
	}

	#[test]
	fn test_is_exit() {
		assert!(Error::Exit(1).is_exit());
		assert!(!Error::Internal("x".into()).is_exit());
	}
}
