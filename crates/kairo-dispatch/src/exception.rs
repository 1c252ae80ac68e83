//! Turning request failures into responses.

use http::header::{ALLOW, CONTENT_TYPE, HeaderValue};
use http::StatusCode;
use kairo_exception::{Error, HttpError, Result};
use kairo_http::{Request, Response};
use kairo_template::{ERROR_TEMPLATE, MAINTENANCE_TEMPLATE, Renderer};
use serde_json::json;
use std::error::Error as StdError;

use crate::application::Application;
use crate::context;

pub const MAINTENANCE_MESSAGE: &str = "The service might be under maintenance.";
const REQUEST_REPR_UNAVAILABLE: &str = "Request repr() unavailable";

/// Produce the response for a failed request.
///
/// # Errors
///
/// [`Error::Exit`] is returned unchanged, as is an uncaught failure on a
/// development server running with `debug`.
pub(crate) async fn translate(
	app: &Application,
	request: &mut Request,
	error: Error,
) -> Result<Response> {
	match error {
		Error::Redirect(location) => Ok(Response::permanent_redirect(location)),
		Error::Http(http) => {
			tracing::warn!(status = http.status().as_u16(), error = %http, "http exception");
			Ok(render_error(app.components.renderer.as_ref(), &http))
		}
		Error::Exit(code) => Err(Error::Exit(code)),
		Error::CapabilityDisabled(capability) => {
			tracing::error!(capability = %capability, "capability disabled");
			// Persisting the session would fail as well.
			request.session = None;
			Ok(maintenance_page(app.components.renderer.as_ref()))
		}
		other => handle_uncaught(app, request, other).await,
	}
}

/// Error page for `error`, falling back to the plain built-in body when
/// the template cannot be rendered.
pub fn render_error(renderer: &dyn Renderer, error: &HttpError) -> Response {
	let context = json!({
		"code": error.status().as_u16(),
		"name": error.name(),
		"description": error.description(),
	});
	let body = renderer.render(ERROR_TEMPLATE, &context).unwrap_or_else(|err| {
		tracing::warn!(error = %err, "failed to render error page");
		error.default_body()
	});

	let mut response = Response::new(error.status()).html(body);
	if error.status() == StatusCode::METHOD_NOT_ALLOWED && !error.allowed_methods().is_empty() {
		let allow = error
			.allowed_methods()
			.iter()
			.map(|method| method.as_str())
			.collect::<Vec<_>>()
			.join(", ");
		if let Ok(value) = HeaderValue::from_str(&allow) {
			response.headers.insert(ALLOW, value);
		}
	}
	response
}

fn maintenance_page(renderer: &dyn Renderer) -> Response {
	let message = context::gettext(MAINTENANCE_MESSAGE);
	let body = renderer
		.render(MAINTENANCE_TEMPLATE, &json!({ "message": message }))
		.unwrap_or_else(|err| {
			tracing::warn!(error = %err, "failed to render maintenance page");
			message
		});
	let mut response = Response::service_unavailable().with_body(body);
	response.headers.insert(
		CONTENT_TYPE,
		HeaderValue::from_static("text/html; charset=utf-8"),
	);
	response
}

async fn handle_uncaught(app: &Application, request: &Request, error: Error) -> Result<Response> {
	let settings = &app.settings;
	if settings.is_development_server() && settings.debug {
		return Err(error);
	}

	let request_repr = request
		.dump()
		.unwrap_or_else(|_| REQUEST_REPR_UNAVAILABLE.to_string());
	let message = format!("{}\n\n{}", format_trace(&error), request_repr);

	let reporter = app.components.error_reporter.as_ref();
	match reporter {
		Some(reporter) => {
			tracing::error!(error = %error, "An Unhandled Exception Occurred.");
			reporter.report(&message, &error);
		}
		None => tracing::error!("{}", message),
	}

	if settings.debug {
		let http = HttpError::internal_server_error().with_description(trace_html(&message));
		return Ok(Response::new(http.status()).html(http.default_body()));
	}

	if reporter.is_none() {
		let remote_addr = request
			.remote_addr
			.map(|addr| addr.ip().to_string())
			.unwrap_or_else(|| "unknown".to_string());
		let subject = format!("Error {}: {}", remote_addr, request.path());
		if let Err(err) = app.components.mailer.mail_admins(&subject, &message).await {
			tracing::debug!(error = %err, "failed to mail admins");
		}
	}
	Ok(render_error(
		app.components.renderer.as_ref(),
		&HttpError::internal_server_error(),
	))
}

/// Escape a plain-text trace for an HTML page, keeping its line breaks.
fn trace_html(trace: &str) -> String {
	trace
		.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('\n', "<br/>\n")
}

/// The error, its chain of causes and, for application errors, their
/// debug representation (including a backtrace when captured).
pub fn format_trace(error: &Error) -> String {
	if let Error::Other(inner) = error {
		return format!("{:?}", inner);
	}
	let mut trace = format!("Error: {}", error);
	let mut source = error.source();
	while let Some(cause) = source {
		trace.push_str(&format!("\nCaused by: {}", cause));
		source = cause.source();
	}
	trace
}

#[cfg(test)]
mod tests {
	use super::*;
	use kairo_template::TeraRenderer;

	#[test]
	fn test_format_trace_walks_causes() {
		let cause = std::io::Error::other("disk full");
		let error: Error = HttpError::internal_server_error().with_cause(cause).into();
		let trace = format_trace(&error);
		assert!(trace.starts_with("Error: 500 Internal Server Error"));
		assert!(trace.contains("Caused by: disk full"));
	}

	#[test]
	fn test_format_trace_of_application_error() {
		let error: Error = anyhow::anyhow!("inner").context("outer").into();
		let trace = format_trace(&error);
		assert!(trace.starts_with("outer"));
		assert!(trace.contains("inner"));
	}

	#[test]
	fn test_trace_html_escapes_markup_before_breaks() {
		assert_eq!(
			trace_html("GET /<script>?a=1&b=2\n\"x\": \"&lt;\""),
			"GET /&lt;script&gt;?a=1&amp;b=2<br/>\n\"x\": \"&amp;lt;\""
		);
	}

	#[test]
	fn test_method_not_allowed_lists_allow_header() {
		let renderer = TeraRenderer::new().unwrap();
		let error = HttpError::method_not_allowed(vec![http::Method::GET, http::Method::HEAD]);
		let response = render_error(&renderer, &error);
		assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
		assert_eq!(response.headers[ALLOW], "GET, HEAD");
		assert!(response.body_text().contains("405 Method Not Allowed"));
	}

	#[test]
	fn test_maintenance_page_outside_request_uses_message() {
		let renderer = TeraRenderer::new().unwrap();
		let response = maintenance_page(&renderer);
		assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
		assert_eq!(response.headers[CONTENT_TYPE], "text/html; charset=utf-8");
		assert!(response.body_text().contains(MAINTENANCE_MESSAGE));
	}
}
