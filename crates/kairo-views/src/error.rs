use kairo_exception::{Error, HttpError};
use thiserror::Error;

/// Failure to turn an endpoint into a callable view
#[derive(Debug, Error)]
pub enum ViewResolutionError {
	#[error("No view registered for endpoint `{0}`")]
	UnknownEndpoint(String),

	#[error("Failed to import `{0}`")]
	ImportFailed(String),

	#[error("`{0}` is not a view")]
	NotCallable(String),

	#[error("Failed to construct `{class_path}`: {source}")]
	Construction {
		class_path: String,
		#[source]
		source: anyhow::Error,
	},
}

impl From<ViewResolutionError> for Error {
	fn from(err: ViewResolutionError) -> Self {
		Error::Http(HttpError::internal_server_error().with_cause(err))
	}
}

pub type Result<T> = std::result::Result<T, ViewResolutionError>;
