//! Incoming request representation.

use bytes::Bytes;
use cookie::Cookie;
use http::{Extensions, HeaderMap, HeaderName, HeaderValue, Method, Uri, Version};
use serde::Serialize;
use std::collections::BTreeMap;
use std::net::SocketAddr;

use crate::Session;

/// HTTP request as seen by middleware and views.
///
/// `script_name` holds the mount prefix under which the application was
/// reached (set by the sub-application dispatcher); `path()` is always
/// relative to it.
#[derive(Debug)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub remote_addr: Option<SocketAddr>,
	pub script_name: String,
	/// Language negotiated for this request
	pub lang: Option<String>,
	pub session: Option<Session>,
	pub is_secure: bool,
	query_params: Vec<(String, String)>,
	extensions: Extensions,
}

impl Request {
	/// Create a request from its raw parts.
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		let query_params = parse_query(&uri);
		Self {
			method,
			uri,
			version,
			headers,
			body,
			remote_addr: None,
			script_name: String::new(),
			lang: None,
			session: None,
			is_secure: false,
			query_params,
			extensions: Extensions::new(),
		}
	}

	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Decoded query parameters in their original order.
	pub fn query_params(&self) -> &[(String, String)] {
		&self.query_params
	}

	/// First value of a query parameter.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_http::Request;
	///
	/// let request = Request::builder()
	///     .uri("/search?q=rust%20lang&q=other")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.query("q"), Some("rust lang"));
	/// assert_eq!(request.query("missing"), None);
	/// ```
	pub fn query(&self, name: &str) -> Option<&str> {
		self.query_params
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	/// Query parameters re-encoded as `application/x-www-form-urlencoded`.
	pub fn encoded_query(&self) -> String {
		serde_urlencoded::to_string(&self.query_params).unwrap_or_default()
	}

	/// Host the request was addressed to, from the `Host` header or the URI.
	pub fn host(&self) -> Option<&str> {
		self.headers
			.get(http::header::HOST)
			.and_then(|h| h.to_str().ok())
			.or_else(|| self.uri.authority().map(|a| a.as_str()))
	}

	pub fn scheme(&self) -> &str {
		if self.is_secure { "https" } else { "http" }
	}

	/// Value of a request cookie.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_http::Request;
	///
	/// let request = Request::builder()
	///     .uri("/")
	///     .header("cookie", "hl=ja; sid=abc")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.cookie("hl").as_deref(), Some("ja"));
	/// ```
	pub fn cookie(&self, name: &str) -> Option<String> {
		self.headers
			.get_all(http::header::COOKIE)
			.iter()
			.filter_map(|value| value.to_str().ok())
			.flat_map(Cookie::split_parse)
			.filter_map(|cookie| cookie.ok())
			.find(|cookie| cookie.name() == name)
			.map(|cookie| cookie.value().to_string())
	}

	pub fn extensions(&self) -> &Extensions {
		&self.extensions
	}

	pub fn extensions_mut(&mut self) -> &mut Extensions {
		&mut self.extensions
	}

	/// Human readable dump used in error reports.
	///
	/// # Errors
	///
	/// Fails when the request cannot be serialized.
	pub fn dump(&self) -> serde_json::Result<String> {
		let headers: BTreeMap<&str, &str> = self
			.headers
			.iter()
			.filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?)))
			.collect();
		let dump = RequestDump {
			method: self.method.as_str(),
			script_name: &self.script_name,
			path: self.path(),
			query: &self.query_params,
			headers,
			remote_addr: self.remote_addr.map(|addr| addr.to_string()),
			lang: self.lang.as_deref(),
		};
		serde_json::to_string_pretty(&dump)
	}
}

#[derive(Serialize)]
struct RequestDump<'a> {
	method: &'a str,
	script_name: &'a str,
	path: &'a str,
	query: &'a [(String, String)],
	headers: BTreeMap<&'a str, &'a str>,
	remote_addr: Option<String>,
	lang: Option<&'a str>,
}

fn parse_query(uri: &Uri) -> Vec<(String, String)> {
	uri.query()
		.and_then(|q| serde_urlencoded::from_str(q).ok())
		.unwrap_or_default()
}

/// Builder for [`Request`], mainly used by tests and adapters.
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: String,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
	remote_addr: Option<SocketAddr>,
	script_name: String,
	secure: bool,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: "/".to_string(),
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			remote_addr: None,
			script_name: String::new(),
			secure: false,
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = uri.into();
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Append a header. Invalid names or values are ignored.
	pub fn header(mut self, name: &str, value: &str) -> Self {
		if let Ok(name) = HeaderName::from_bytes(name.as_bytes())
			&& let Ok(value) = HeaderValue::from_str(value)
		{
			self.headers.append(name, value);
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
		self.remote_addr = Some(addr);
		self
	}

	pub fn script_name(mut self, script_name: impl Into<String>) -> Self {
		self.script_name = script_name.into();
		self
	}

	pub fn secure(mut self, secure: bool) -> Self {
		self.secure = secure;
		self
	}

	/// # Errors
	///
	/// Returns an error when the URI cannot be parsed.
	pub fn build(self) -> Result<Request, http::Error> {
		let uri = Uri::try_from(self.uri)?;
		let mut request = Request::new(self.method, uri, self.version, self.headers, self.body);
		request.remote_addr = self.remote_addr;
		request.script_name = self.script_name;
		request.is_secure = self.secure;
		Ok(request)
	}
}
