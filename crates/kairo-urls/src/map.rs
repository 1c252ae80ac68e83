use kairo_http::Request;
use std::sync::Arc;

use crate::adapter::MapAdapter;
use crate::error::Result;
use crate::pattern::PathPattern;
use crate::rule::Rule;

#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
	pub(crate) rule: Rule,
	pub(crate) pattern: PathPattern,
}

/// Ordered collection of compiled rules.
///
/// Rules are tried in insertion order; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct UrlMap {
	rules: Vec<CompiledRule>,
}

impl UrlMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Compile and append a rule.
	///
	/// # Errors
	///
	/// Returns the pattern compilation error; the map is left unchanged.
	pub fn add(&mut self, rule: Rule) -> Result<()> {
		let pattern = PathPattern::new(&rule.path)?;
		self.rules.push(CompiledRule { rule, pattern });
		Ok(())
	}

	/// Compile and append several rules, stopping at the first failure.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_urls::{Rule, UrlMap, submount};
	///
	/// let mut map = UrlMap::new();
	/// map.extend(submount("/blog", vec![Rule::new("/", "blog/index")])).unwrap();
	/// assert_eq!(map.len(), 1);
	/// ```
	pub fn extend(&mut self, rules: impl IntoIterator<Item = Rule>) -> Result<()> {
		for rule in rules {
			self.add(rule)?;
		}
		Ok(())
	}

	pub fn rules(&self) -> impl Iterator<Item = &Rule> {
		self.rules.iter().map(|compiled| &compiled.rule)
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Whether any rule routes to `endpoint`.
	pub fn has_endpoint(&self, endpoint: &str) -> bool {
		self.rules().any(|rule| rule.endpoint == endpoint)
	}

	pub(crate) fn compiled(&self) -> &[CompiledRule] {
		&self.rules
	}

	/// Bind the map to an explicit host and path.
	pub fn bind(
		self: &Arc<Self>,
		host: Option<&str>,
		path: &str,
		script_name: &str,
		scheme: &str,
	) -> MapAdapter {
		MapAdapter::new(
			Arc::clone(self),
			host.map(str::to_string),
			path.to_string(),
			script_name.to_string(),
			scheme.to_string(),
		)
	}

	/// Bind the map to a request's host, path, script name and scheme.
	pub fn bind_to_request(self: &Arc<Self>, request: &Request) -> MapAdapter {
		self.bind(
			request.host(),
			request.path(),
			&request.script_name,
			request.scheme(),
		)
	}
}
