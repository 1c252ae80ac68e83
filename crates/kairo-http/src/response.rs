use bytes::Bytes;
use cookie::Cookie;
use http::header::{self, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use kairo_exception::Error;
use serde::Serialize;

/// HTTP response representation
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use kairo_http::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	pub fn service_unavailable() -> Self {
		Self::new(StatusCode::SERVICE_UNAVAILABLE)
	}

	/// Create a Response with HTTP 301 Moved Permanently
	///
	/// # Examples
	///
	/// ```
	/// use kairo_http::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::permanent_redirect("/new-location/");
	/// assert_eq!(response.status, StatusCode::MOVED_PERMANENTLY);
	/// assert_eq!(
	///     response.headers.get("location").unwrap().to_str().unwrap(),
	///     "/new-location/"
	/// );
	/// ```
	pub fn permanent_redirect(location: impl AsRef<str>) -> Self {
		let location = location.as_ref();
		Self::new(StatusCode::MOVED_PERMANENTLY)
			.with_location(location)
			.html(format!(
				"<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 3.2 Final//EN\">\n\
				 <title>Redirecting...</title>\n\
				 <h1>Redirecting...</h1>\n\
				 <p>You should be redirected automatically to target URL: \
				 <a href=\"{0}\">{0}</a>.  If not click the link.",
				location
			))
	}

	/// HTML response with status 200.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_http::Response;
	///
	/// let response = Response::ok().html("<p>hi</p>");
	/// assert_eq!(
	///     response.headers.get("content-type").unwrap(),
	///     "text/html; charset=utf-8"
	/// );
	/// ```
	pub fn html(self, body: impl Into<Bytes>) -> Self {
		self.with_content_type("text/html; charset=utf-8")
			.with_body(body)
	}

	pub fn with_status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a header. Invalid names or values are ignored.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_http::Response;
	///
	/// let response = Response::ok().with_header("X-Custom", "value");
	/// assert_eq!(response.headers.get("x-custom").unwrap(), "value");
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(name) = HeaderName::from_bytes(name.as_bytes())
			&& let Ok(value) = HeaderValue::from_str(value)
		{
			self.headers.insert(name, value);
		}
		self
	}

	pub fn with_location(mut self, location: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(location) {
			self.headers.insert(header::LOCATION, value);
		}
		self
	}

	pub fn with_content_type(mut self, content_type: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(content_type) {
			self.headers.insert(header::CONTENT_TYPE, value);
		}
		self
	}

	/// Serialize `data` as the JSON body.
	///
	/// # Errors
	///
	/// Returns [`Error::Internal`] when serialization fails.
	pub fn with_json<T: Serialize>(self, data: &T) -> kairo_exception::Result<Self> {
		let json = serde_json::to_vec(data)
			.map_err(|e| Error::Internal(format!("JSON serialization failed: {}", e)))?;
		Ok(self.with_content_type("application/json").with_body(json))
	}

	/// Append a `Set-Cookie` header.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_http::Response;
	/// use cookie::Cookie;
	///
	/// let mut response = Response::ok();
	/// response.set_cookie(&Cookie::new("hl", "en"));
	/// assert_eq!(response.headers.get("set-cookie").unwrap(), "hl=en");
	/// ```
	pub fn set_cookie(&mut self, cookie: &Cookie<'_>) {
		if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
			self.headers.append(header::SET_COOKIE, value);
		}
	}

	/// Body decoded as UTF-8, lossily.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

impl Default for Response {
	fn default() -> Self {
		Self::ok()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_with_header_ignores_invalid_name() {
		let response = Response::ok().with_header("bad header", "v");
		assert!(response.headers.is_empty());
	}

	#[test]
	fn test_set_cookie_appends() {
		let mut response = Response::ok();
		response.set_cookie(&Cookie::new("a", "1"));
		response.set_cookie(&Cookie::new("b", "2"));
		assert_eq!(response.headers.get_all(header::SET_COOKIE).iter().count(), 2);
	}

	#[test]
	fn test_with_json_sets_content_type() {
		let response = Response::ok()
			.with_json(&serde_json::json!({"ok": true}))
			.unwrap();
		assert_eq!(response.headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
		assert_eq!(response.body_text(), r#"{"ok":true}"#);
	}

	#[test]
	fn test_permanent_redirect_body_mentions_target() {
		let response = Response::permanent_redirect("/a/");
		assert!(response.body_text().contains("<a href=\"/a/\">/a/</a>"));
	}
}
