//! Rule declarations and rule factories.

use http::Method;

/// A URL rule: a path pattern routed to an endpoint identifier.
///
/// Rules are plain declarations; patterns are compiled when the rule is
/// added to a [`UrlMap`](crate::UrlMap).
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
	pub path: String,
	pub endpoint: String,
	/// Accepted methods; `None` accepts any method
	pub methods: Option<Vec<Method>>,
	/// Only match requests addressed to this host
	pub host: Option<String>,
	/// Mount prefix applied by [`submount`]
	pub submount: Option<String>,
}

impl Rule {
	/// Create a rule accepting any method.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_urls::Rule;
	/// use http::Method;
	///
	/// let rule = Rule::new("/posts/{id:int}/", "blog/show")
	///     .with_methods([Method::GET, Method::POST]);
	/// assert_eq!(rule.endpoint, "blog/show");
	/// assert!(rule.allows(&Method::HEAD));
	/// assert!(!rule.allows(&Method::DELETE));
	/// ```
	pub fn new(path: impl Into<String>, endpoint: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			endpoint: endpoint.into(),
			methods: None,
			host: None,
			submount: None,
		}
	}

	/// Restrict the rule to `methods`. `HEAD` is implied by `GET`.
	pub fn with_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
		let mut methods: Vec<Method> = methods.into_iter().collect();
		if methods.contains(&Method::GET) && !methods.contains(&Method::HEAD) {
			methods.push(Method::HEAD);
		}
		self.methods = Some(methods);
		self
	}

	pub fn with_host(mut self, host: impl Into<String>) -> Self {
		self.host = Some(host.into());
		self
	}

	pub fn allows(&self, method: &Method) -> bool {
		self.methods
			.as_ref()
			.is_none_or(|methods| methods.contains(method))
	}

	pub(crate) fn host_matches(&self, host: Option<&str>) -> bool {
		match (&self.host, host) {
			(None, _) => true,
			(Some(_), None) => false,
			(Some(expected), Some(actual)) => {
				let bare = actual.split(':').next().unwrap_or(actual);
				expected.eq_ignore_ascii_case(actual) || expected.eq_ignore_ascii_case(bare)
			}
		}
	}
}

/// Mount `rules` under a path prefix.
///
/// # Examples
///
/// ```
/// use kairo_urls::{Rule, submount};
///
/// let rules = submount("/blog", vec![Rule::new("/", "index"), Rule::new("/{slug}", "show")]);
/// assert_eq!(rules[0].path, "/blog/");
/// assert_eq!(rules[1].path, "/blog/{slug}");
/// assert_eq!(rules[1].submount.as_deref(), Some("/blog"));
/// ```
pub fn submount(prefix: &str, rules: impl IntoIterator<Item = Rule>) -> Vec<Rule> {
	let prefix = prefix.trim_end_matches('/');
	rules
		.into_iter()
		.map(|mut rule| {
			rule.path = format!("{}{}", prefix, rule.path);
			rule.submount = Some(match &rule.submount {
				Some(inner) => format!("{}{}", prefix, inner),
				None if prefix.is_empty() => "/".to_string(),
				None => prefix.to_string(),
			});
			rule
		})
		.collect()
}

/// Prefix the endpoint of every rule.
///
/// # Examples
///
/// ```
/// use kairo_urls::{Rule, endpoint_prefix};
///
/// let rules = endpoint_prefix("blog/", vec![Rule::new("/", "index")]);
/// assert_eq!(rules[0].endpoint, "blog/index");
/// ```
pub fn endpoint_prefix(prefix: &str, rules: impl IntoIterator<Item = Rule>) -> Vec<Rule> {
	rules
		.into_iter()
		.map(|mut rule| {
			rule.endpoint = format!("{}{}", prefix, rule.endpoint);
			rule
		})
		.collect()
}
