//! URL declarations of installed applications and their assembly into one
//! route table.

use kairo_conf::Settings;
use kairo_exception::{Error, Result};
use kairo_urls::{Rule, UrlMap, submount};
use kairo_views::{ViewGroup, ViewReference, ViewRegistry};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::auth::{AuthBackend, AuthenticationMiddleware};
use crate::components::Components;

/// Produces the rules of a URL declaration module.
pub type MakeRules = Arc<dyn Fn() -> Vec<Rule> + Send + Sync>;

/// The URL declarations of one module.
#[derive(Clone)]
pub enum UrlConf {
	/// View groups; endpoints are namespaced with the app name
	ViewGroups(Vec<Arc<dyn ViewGroup>>),
	/// Plain rules plus the endpoint to view table they route to
	Rules {
		make_rules: Option<MakeRules>,
		all_views: Vec<(String, ViewReference)>,
	},
}

impl UrlConf {
	pub fn view_groups(groups: impl IntoIterator<Item = Arc<dyn ViewGroup>>) -> Self {
		UrlConf::ViewGroups(groups.into_iter().collect())
	}

	/// # Examples
	///
	/// ```
	/// use kairo_dispatch::UrlConf;
	/// use kairo_urls::Rule;
	/// use kairo_views::ViewReference;
	///
	/// let conf = UrlConf::rules(
	///     || vec![Rule::new("/", "wiki/index")],
	///     vec![("wiki/index".to_string(), ViewReference::lazy("wiki.views.index"))],
	/// );
	/// # let _ = conf;
	/// ```
	pub fn rules<F>(make_rules: F, all_views: Vec<(String, ViewReference)>) -> Self
	where
		F: Fn() -> Vec<Rule> + Send + Sync + 'static,
	{
		UrlConf::Rules {
			make_rules: Some(Arc::new(make_rules)),
			all_views,
		}
	}

	/// Rules and views with endpoints prefixed by `prefix` for view groups.
	fn collect(&self, prefix: &str) -> (Vec<Rule>, Vec<(String, ViewReference)>) {
		match self {
			UrlConf::ViewGroups(groups) => {
				let mut rules = Vec::new();
				let mut views = Vec::new();
				for group in groups {
					rules.extend(group.get_rules(prefix));
					views.extend(group.get_views(prefix));
				}
				(rules, views)
			}
			UrlConf::Rules {
				make_rules,
				all_views,
			} => {
				let rules = make_rules.as_ref().map(|make| make()).unwrap_or_default();
				(rules, all_views.clone())
			}
		}
	}
}

impl fmt::Debug for UrlConf {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			UrlConf::ViewGroups(groups) => f
				.debug_tuple("ViewGroups")
				.field(&format_args!("[{} groups]", groups.len()))
				.finish(),
			UrlConf::Rules { all_views, .. } => f
				.debug_struct("Rules")
				.field("views", &all_views.len())
				.finish_non_exhaustive(),
		}
	}
}

/// URL declaration modules by dotted name, plus the mount points
/// applications declare for themselves.
#[derive(Debug, Clone, Default)]
pub struct UrlConfRegistry {
	modules: HashMap<String, UrlConf>,
	mount_points: HashMap<String, Option<String>>,
}

impl UrlConfRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register the declarations of `module` (for example `"myapp.urls"`).
	pub fn register(&mut self, module: impl Into<String>, conf: UrlConf) {
		self.modules.insert(module.into(), conf);
	}

	pub fn with_module(mut self, module: impl Into<String>, conf: UrlConf) -> Self {
		self.register(module, conf);
		self
	}

	/// Mount point an application declares for itself; `None` opts out of
	/// mounting.
	pub fn declare_mount_point(&mut self, app: impl Into<String>, mount_point: Option<&str>) {
		self.mount_points
			.insert(app.into(), mount_point.map(str::to_string));
	}

	pub fn get(&self, module: &str) -> Option<&UrlConf> {
		self.modules.get(module)
	}

	pub fn declared_mount_point(&self, app: &str) -> Option<Option<&str>> {
		self.mount_points.get(app).map(Option::as_deref)
	}
}

/// Last component of a dotted application name.
///
/// # Examples
///
/// ```
/// use kairo_dispatch::app_tail_name;
///
/// assert_eq!(app_tail_name("myproject.blog"), "blog");
/// assert_eq!(app_tail_name("wiki"), "wiki");
/// ```
pub fn app_tail_name(app: &str) -> &str {
	app.rsplit('.').next().unwrap_or(app)
}

/// Where `app` is mounted: the settings first, then the app's own
/// declaration, then `/{tail}`. `None` means the app is not mounted.
pub fn mount_point(settings: &Settings, registry: &UrlConfRegistry, app: &str) -> Option<String> {
	if let Some(configured) = settings.mount_point_for(app) {
		return configured.map(str::to_string);
	}
	if let Some(declared) = registry.declared_mount_point(app) {
		return declared.map(str::to_string);
	}
	Some(format!("/{}", app_tail_name(app)))
}

/// Route table, endpoint table and auth backend built from the settings.
pub(crate) struct Routing {
	pub(crate) map: Arc<UrlMap>,
	pub(crate) views: ViewRegistry,
	pub(crate) auth_backend: Option<Arc<dyn AuthBackend>>,
}

impl fmt::Debug for Routing {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Routing")
			.field("rules", &self.map.len())
			.field("views", &self.views.len())
			.field("auth_backend", &self.auth_backend.is_some())
			.finish()
	}
}

/// Merge the project URL module and every installed app's declarations.
///
/// The project module (`root_url_module`) is optional and mounted at the
/// root. Each installed app is looked up as `{app}.{root_url_module}`,
/// then `{app}.urls`, and mounted under its mount point.
pub(crate) fn build_routing(settings: &Settings, components: &Components) -> Result<Routing> {
	let registry = &components.urlconfs;
	let mut map = UrlMap::new();
	let mut views = ViewRegistry::new();

	match registry.get(&settings.root_url_module) {
		Some(conf) => {
			let (rules, root_views) = conf.collect("");
			map.extend(rules)?;
			views.extend(root_views);
		}
		None => tracing::debug!(
			module = %settings.root_url_module,
			"no project URL module registered"
		),
	}

	for app in &settings.installed_apps {
		let Some(mount) = mount_point(settings, registry, app) else {
			tracing::debug!(app = %app, "mount point explicitly unset, skipped");
			continue;
		};

		let module = format!("{}.{}", app, settings.root_url_module);
		let fallback = format!("{}.urls", app);
		let conf = registry
			.get(&module)
			.or_else(|| registry.get(&fallback))
			.ok_or_else(|| {
				tracing::error!(app = %app, "failed to find URL module");
				Error::ImproperlyConfigured(format!("Failed to import app '{}'", fallback))
			})?;

		let prefix = format!("{}/", app_tail_name(app));
		let (rules, app_views) = conf.collect(&prefix);
		map.extend(submount(&mount, rules))?;
		views.extend(app_views);
	}

	let auth_backend = if settings
		.middleware
		.iter()
		.any(|id| id == AuthenticationMiddleware::IDENTIFIER)
	{
		let name = settings.auth_user_backend.as_deref().ok_or_else(|| {
			Error::ImproperlyConfigured(
				"auth_user_backend must be set to use AuthenticationMiddleware".to_string(),
			)
		})?;
		Some(components.auth_backends.instantiate(name)?)
	} else {
		None
	};

	tracing::debug!(rules = map.len(), views = views.len(), "route table built");

	Ok(Routing {
		map: Arc::new(map),
		views,
		auth_backend,
	})
}
