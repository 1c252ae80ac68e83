//! View groups: rules and their views declared together.

use kairo_urls::{Rule, endpoint_prefix};
use std::collections::HashMap;

use crate::ViewReference;

/// A set of rules bundled with the views they route to.
///
/// When merged into an application, endpoints are namespaced with the
/// owning app's prefix (`"blog/"`), applied to rules and views alike.
pub trait ViewGroup: Send + Sync {
	/// Rules with un-prefixed endpoints
	fn rules(&self) -> Vec<Rule>;

	/// Un-prefixed endpoint to view pairs
	fn views(&self) -> Vec<(String, ViewReference)>;

	fn get_rules(&self, prefix: &str) -> Vec<Rule> {
		endpoint_prefix(prefix, self.rules())
	}

	fn get_views(&self, prefix: &str) -> HashMap<String, ViewReference> {
		self.views()
			.into_iter()
			.map(|(endpoint, view)| (format!("{}{}", prefix, endpoint), view))
			.collect()
	}
}

/// A [`ViewGroup`] built from explicit `(rule, view)` pairs.
///
/// # Examples
///
/// ```
/// use kairo_views::{RouteGroup, ViewGroup, ViewReference};
/// use kairo_urls::Rule;
///
/// let group = RouteGroup::new()
///     .route(Rule::new("/", "index"), ViewReference::lazy("blog.views.index"))
///     .route(Rule::new("/{slug}/", "show"), ViewReference::lazy("blog.views.show"));
///
/// let rules = group.get_rules("blog/");
/// assert_eq!(rules[1].endpoint, "blog/show");
/// assert!(group.get_views("blog/").contains_key("blog/index"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteGroup {
	entries: Vec<(Rule, ViewReference)>,
}

impl RouteGroup {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn route(mut self, rule: Rule, view: impl Into<ViewReference>) -> Self {
		self.entries.push((rule, view.into()));
		self
	}
}

impl ViewGroup for RouteGroup {
	fn rules(&self) -> Vec<Rule> {
		self.entries.iter().map(|(rule, _)| rule.clone()).collect()
	}

	fn views(&self) -> Vec<(String, ViewReference)> {
		self.entries
			.iter()
			.map(|(rule, view)| (rule.endpoint.clone(), view.clone()))
			.collect()
	}
}
