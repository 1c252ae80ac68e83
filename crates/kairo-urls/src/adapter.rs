//! Route resolution against a bound request.

use http::Method;
use std::sync::Arc;

use crate::converter::ViewParams;
use crate::error::{RoutingError, UrlError};
use crate::map::UrlMap;

/// Endpoint and converted parameters of a successful match
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
	pub endpoint: String,
	pub params: ViewParams,
}

/// A [`UrlMap`] bound to one request's host and path.
///
/// The adapter owns a shared handle to the map so it can outlive the
/// borrow that created it (it is stored in the request context).
#[derive(Debug, Clone)]
pub struct MapAdapter {
	map: Arc<UrlMap>,
	host: Option<String>,
	path: String,
	script_name: String,
	scheme: String,
}

impl MapAdapter {
	pub(crate) fn new(
		map: Arc<UrlMap>,
		host: Option<String>,
		path: String,
		script_name: String,
		scheme: String,
	) -> Self {
		let path = if path.is_empty() { "/".to_string() } else { path };
		Self {
			map,
			host,
			path,
			script_name: script_name.trim_end_matches('/').to_string(),
			scheme,
		}
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn host(&self) -> Option<&str> {
		self.host.as_deref()
	}

	pub fn script_name(&self) -> &str {
		&self.script_name
	}

	pub fn map(&self) -> &Arc<UrlMap> {
		&self.map
	}

	/// Resolve the bound path for `method`.
	///
	/// Rules are tried in order. A rule whose pattern ends in `/` matching a
	/// path without the slash yields [`RoutingError::RequestRedirect`] to the
	/// canonical URL. When some rule matched the path but none accepted the
	/// method the result is [`RoutingError::MethodNotAllowed`].
	///
	/// # Examples
	///
	/// ```
	/// use kairo_urls::{Rule, RoutingError, UrlMap};
	/// use http::Method;
	/// use std::sync::Arc;
	///
	/// let mut map = UrlMap::new();
	/// map.add(Rule::new("/posts/", "posts")).unwrap();
	/// let map = Arc::new(map);
	///
	/// let adapter = map.bind(Some("example.com"), "/posts", "", "http");
	/// assert_eq!(
	///     adapter.match_route(&Method::GET),
	///     Err(RoutingError::RequestRedirect {
	///         new_url: "http://example.com/posts/".into()
	///     })
	/// );
	/// ```
	pub fn match_route(&self, method: &Method) -> Result<ResolvedRoute, RoutingError> {
		let mut allowed: Vec<Method> = Vec::new();

		for compiled in self.map.compiled() {
			let rule = &compiled.rule;
			if !rule.host_matches(self.host.as_deref()) {
				continue;
			}
			let Some(matched) = compiled.pattern.matches(&self.path) else {
				continue;
			};
			if matched.missing_slash {
				return Err(RoutingError::RequestRedirect {
					new_url: self.absolute_url(&format!("{}/", self.path)),
				});
			}
			if !rule.allows(method) {
				if let Some(methods) = &rule.methods {
					for m in methods {
						if !allowed.contains(m) {
							allowed.push(m.clone());
						}
					}
				}
				continue;
			}
			return Ok(ResolvedRoute {
				endpoint: rule.endpoint.clone(),
				params: matched.params,
			});
		}

		if allowed.is_empty() {
			Err(RoutingError::NotFound)
		} else {
			Err(RoutingError::MethodNotAllowed { allowed })
		}
	}

	/// Build the URL of `endpoint`.
	///
	/// The first rule for the endpoint whose parameters are all provided is
	/// used; leftover parameters become the query string. With `external`
	/// the URL includes scheme and host.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_urls::{ParamValue, Rule, UrlMap, ViewParams};
	/// use std::sync::Arc;
	///
	/// let mut map = UrlMap::new();
	/// map.add(Rule::new("/posts/{id:int}/", "show")).unwrap();
	/// let adapter = Arc::new(map).bind(Some("example.com"), "/", "/app", "https");
	///
	/// let mut params = ViewParams::new();
	/// params.insert("id".into(), ParamValue::Int(3));
	/// assert_eq!(adapter.build("show", &params, false).unwrap(), "/app/posts/3/");
	/// assert_eq!(
	///     adapter.build("show", &params, true).unwrap(),
	///     "https://example.com/app/posts/3/"
	/// );
	/// ```
	pub fn build(
		&self,
		endpoint: &str,
		params: &ViewParams,
		external: bool,
	) -> Result<String, UrlError> {
		let compiled = self
			.map
			.compiled()
			.iter()
			.filter(|compiled| compiled.rule.endpoint == endpoint)
			.find(|compiled| compiled.pattern.accepts(params))
			.ok_or_else(|| UrlError::Build {
				endpoint: endpoint.to_string(),
			})?;

		let path = compiled.pattern.build(params).ok_or_else(|| UrlError::Build {
			endpoint: endpoint.to_string(),
		})?;

		let used: Vec<&str> = compiled.pattern.param_names().collect();
		let mut extra: Vec<(&str, String)> = params
			.iter()
			.filter(|(name, _)| !used.contains(&name.as_str()))
			.map(|(name, value)| (name.as_str(), value.to_string()))
			.collect();
		extra.sort();

		let mut url = if external {
			self.absolute_url(&path)
		} else {
			format!("{}{}", self.script_name, path)
		};
		if !extra.is_empty()
			&& let Ok(query) = serde_urlencoded::to_string(&extra)
		{
			url.push('?');
			url.push_str(&query);
		}
		Ok(url)
	}

	fn absolute_url(&self, path: &str) -> String {
		match &self.host {
			Some(host) => format!("{}://{}{}{}", self.scheme, host, self.script_name, path),
			None => format!("{}{}", self.script_name, path),
		}
	}
}
