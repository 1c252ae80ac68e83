//! # Kairo Settings
//!
//! Application configuration loaded from TOML with a handful of
//! environment overrides.
//!
//! ```toml
//! app_name = "blog"
//! debug = false
//! installed_apps = ["myproject.blog", "myproject.wiki"]
//! middleware = ["kairo.middleware.logging.LoggingMiddleware"]
//!
//! [app_mount_points]
//! "myproject.blog" = "/"
//! "myproject.wiki" = false   # not mounted
//! ```

mod env;
mod mount;

pub use env::{DEBUG_ENV, SERVER_SOFTWARE_ENV, parse_bool};

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("Failed to read settings file: {0}")]
	Io(#[from] std::io::Error),

	#[error("Failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("Invalid value for environment variable {name}: {value}")]
	InvalidEnv { name: String, value: String },
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Main settings structure for a Kairo application
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Application name; also keys the translation cache
	pub app_name: String,

	/// Debug mode (error pages include tracebacks)
	pub debug: bool,

	/// Enable per-request language negotiation and translation loading
	pub use_i18n: bool,

	pub default_lang: String,

	/// Languages offered to clients; empty offers only `default_lang`
	pub languages: Vec<String>,

	/// Dotted names of the applications whose URL declarations are merged
	pub installed_apps: Vec<String>,

	/// Explicit mount points; `false` in TOML disables mounting an app
	#[serde(deserialize_with = "mount::deserialize")]
	pub app_mount_points: HashMap<String, Option<String>>,

	/// URL declaration module looked up inside each installed app
	pub root_url_module: String,

	/// Ordered middleware identifiers
	pub middleware: Vec<String>,

	/// Path prefixes served by separately configured sub-applications
	pub submount_apps: Vec<String>,

	/// Registry name of the user backend used by the authentication middleware
	pub auth_user_backend: Option<String>,

	/// Route parameter naming the tenant domain of a marketplace app
	pub marketplace_domain_key: Option<String>,

	/// `(name, email)` pairs notified of uncaught errors in production
	pub admins: Vec<(String, String)>,

	/// Server software string; `Dev*` marks the development server
	pub server_software: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			app_name: "kairo".to_string(),
			debug: false,
			use_i18n: false,
			default_lang: "en".to_string(),
			languages: Vec::new(),
			installed_apps: Vec::new(),
			app_mount_points: HashMap::new(),
			root_url_module: "urls".to_string(),
			middleware: Vec::new(),
			submount_apps: Vec::new(),
			auth_user_backend: None,
			marketplace_domain_key: None,
			admins: Vec::new(),
			server_software: String::new(),
		}
	}
}

impl Settings {
	/// Parse settings from a TOML document.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_conf::Settings;
	///
	/// let settings = Settings::from_toml_str(r#"
	///     app_name = "blog"
	///     installed_apps = ["site.blog"]
	/// "#).unwrap();
	/// assert_eq!(settings.app_name, "blog");
	/// assert_eq!(settings.root_url_module, "urls");
	/// ```
	pub fn from_toml_str(content: &str) -> Result<Self> {
		Ok(toml::from_str(content)?)
	}

	/// Load settings from a TOML file, then apply environment overrides.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path)?;
		tracing::debug!(path = %path.display(), "loading settings");
		Self::from_toml_str(&content)?.with_env_overrides()
	}

	/// Apply `KAIRO_DEBUG` and `SERVER_SOFTWARE` from the process environment.
	pub fn with_env_overrides(mut self) -> Result<Self> {
		if let Some(value) = env::var(DEBUG_ENV) {
			self.debug = parse_bool(&value).ok_or_else(|| SettingsError::InvalidEnv {
				name: DEBUG_ENV.to_string(),
				value,
			})?;
		}
		if let Some(value) = env::var(SERVER_SOFTWARE_ENV) {
			self.server_software = value;
		}
		Ok(self)
	}

	/// Whether the application runs under the development server.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_conf::Settings;
	///
	/// let mut settings = Settings::default();
	/// assert!(!settings.is_development_server());
	/// settings.server_software = "Development/1.0".into();
	/// assert!(settings.is_development_server());
	/// ```
	pub fn is_development_server(&self) -> bool {
		self.server_software.starts_with("Dev")
	}

	/// Explicitly configured mount point for an app.
	///
	/// `None` means not configured; `Some(None)` means mounting is disabled.
	pub fn mount_point_for(&self, app: &str) -> Option<Option<&str>> {
		self.app_mount_points.get(app).map(|m| m.as_deref())
	}

	pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
		self.app_name = name.into();
		self
	}

	pub fn with_debug(mut self, debug: bool) -> Self {
		self.debug = debug;
		self
	}

	pub fn with_i18n(mut self, default_lang: impl Into<String>, languages: &[&str]) -> Self {
		self.use_i18n = true;
		self.default_lang = default_lang.into();
		self.languages = languages.iter().map(|l| l.to_string()).collect();
		self
	}

	pub fn add_app(&mut self, app: impl Into<String>) {
		self.installed_apps.push(app.into());
	}

	pub fn with_app(mut self, app: impl Into<String>) -> Self {
		self.add_app(app);
		self
	}

	pub fn with_mount_point(mut self, app: impl Into<String>, mount: Option<&str>) -> Self {
		self.app_mount_points
			.insert(app.into(), mount.map(str::to_string));
		self
	}

	pub fn add_middleware(&mut self, middleware: impl Into<String>) {
		self.middleware.push(middleware.into());
	}

	pub fn with_middleware(mut self, middleware: impl Into<String>) -> Self {
		self.add_middleware(middleware);
		self
	}

	pub fn with_server_software(mut self, software: impl Into<String>) -> Self {
		self.server_software = software.into();
		self
	}

	pub fn with_admin(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
		self.admins.push((name.into(), email.into()));
		self
	}

	/// Mark this as a marketplace app whose routes carry the tenant domain
	/// in the `key` parameter.
	pub fn with_marketplace_domain_key(mut self, key: impl Into<String>) -> Self {
		self.marketplace_domain_key = Some(key.into());
		self
	}
}
