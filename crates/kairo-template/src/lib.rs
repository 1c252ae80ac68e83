//! # Kairo Template
//!
//! The rendering collaborator used by the dispatcher for error and
//! maintenance pages. [`TeraRenderer`] always carries the built-in
//! `_internal/` templates; applications add their own on top.
//!
//! ```rust
//! use kairo_template::{Renderer, TeraRenderer, MAINTENANCE_TEMPLATE};
//! use serde_json::json;
//!
//! let renderer = TeraRenderer::new().unwrap();
//! let html = renderer
//!     .render(MAINTENANCE_TEMPLATE, &json!({ "message": "Back soon" }))
//!     .unwrap();
//! assert!(html.contains("<p>Back soon</p>"));
//! ```

use serde_json::Value;
use tera::{Context, Tera};
use thiserror::Error;

pub const ERROR_TEMPLATE: &str = "_internal/error.html";
pub const MAINTENANCE_TEMPLATE: &str = "_internal/maintenance.html";

const BUILTIN_TEMPLATES: [(&str, &str); 2] = [
	(
		ERROR_TEMPLATE,
		include_str!("../templates/_internal/error.html"),
	),
	(
		MAINTENANCE_TEMPLATE,
		include_str!("../templates/_internal/maintenance.html"),
	),
];

#[derive(Debug, Error)]
pub enum RenderError {
	#[error("Template error: {0}")]
	Tera(#[from] tera::Error),

	#[error("Template context must be a JSON object, got {0}")]
	InvalidContext(&'static str),
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Renders a named template against a JSON context.
pub trait Renderer: Send + Sync {
	fn render(&self, template: &str, context: &Value) -> RenderResult<String>;
}

impl<T: Renderer + ?Sized> Renderer for std::sync::Arc<T> {
	fn render(&self, template: &str, context: &Value) -> RenderResult<String> {
		(**self).render(template, context)
	}
}

pub struct TeraRenderer {
	tera: Tera,
}

impl TeraRenderer {
	/// Renderer with only the built-in templates.
	pub fn new() -> RenderResult<Self> {
		let mut tera = Tera::default();
		tera.add_raw_templates(BUILTIN_TEMPLATES)?;
		Ok(Self { tera })
	}

	/// Renderer loading application templates from `glob` (for example
	/// `"templates/**/*.html"`). Built-in templates are added only where
	/// the application does not provide its own.
	pub fn from_glob(glob: &str) -> RenderResult<Self> {
		let mut tera = Tera::new(glob)?;
		let missing: Vec<(&str, &str)> = BUILTIN_TEMPLATES
			.into_iter()
			.filter(|(name, _)| !tera.get_template_names().any(|n| n == *name))
			.collect();
		tera.add_raw_templates(missing)?;
		Ok(Self { tera })
	}

	pub fn with_template(mut self, name: &str, content: &str) -> RenderResult<Self> {
		self.tera.add_raw_template(name, content)?;
		Ok(self)
	}

	pub fn has_template(&self, name: &str) -> bool {
		self.tera.get_template_names().any(|n| n == name)
	}
}

impl Renderer for TeraRenderer {
	fn render(&self, template: &str, context: &Value) -> RenderResult<String> {
		let context = match context {
			Value::Null => Context::new(),
			Value::Object(_) => Context::from_value(context.clone())?,
			Value::Bool(_) => return Err(RenderError::InvalidContext("a boolean")),
			Value::Number(_) => return Err(RenderError::InvalidContext("a number")),
			Value::String(_) => return Err(RenderError::InvalidContext("a string")),
			Value::Array(_) => return Err(RenderError::InvalidContext("an array")),
		};
		Ok(self.tera.render(template, &context)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_error_page_escapes_description() {
		let renderer = TeraRenderer::new().unwrap();
		let html = renderer
			.render(
				ERROR_TEMPLATE,
				&json!({ "code": 404, "name": "Not Found", "description": "<script>" }),
			)
			.unwrap();
		assert!(html.contains("<title>404 Not Found</title>"));
		assert!(html.contains("&lt;script&gt;"));
	}

	#[test]
	fn test_scalar_context_is_rejected() {
		let renderer = TeraRenderer::new().unwrap();
		let err = renderer.render(ERROR_TEMPLATE, &json!(3)).unwrap_err();
		assert!(matches!(err, RenderError::InvalidContext("a number")));
	}

	#[test]
	fn test_unknown_template() {
		let renderer = TeraRenderer::new().unwrap();
		assert!(renderer.render("missing.html", &Value::Null).is_err());
	}
}
