use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::View;

/// How an endpoint names its view.
#[derive(Clone)]
pub enum ViewReference {
	/// A view object used as-is
	Direct(Arc<dyn View>),
	/// Dotted path looked up in the symbol registry on each resolution
	Lazy(String),
	/// A view class instantiated with stored arguments on each resolution
	Construct {
		class_path: String,
		args: Vec<Value>,
		kwargs: Map<String, Value>,
	},
}

impl ViewReference {
	pub fn direct(view: Arc<dyn View>) -> Self {
		ViewReference::Direct(view)
	}

	pub fn lazy(path: impl Into<String>) -> Self {
		ViewReference::Lazy(path.into())
	}

	/// Reference a view class with constructor arguments.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_views::ViewReference;
	/// use serde_json::{json, Map};
	///
	/// let mut kwargs = Map::new();
	/// kwargs.insert("template".into(), json!("index.html"));
	/// let reference = ViewReference::construct("site.views.Page", vec![], kwargs);
	/// assert_eq!(reference.describe(), "site.views.Page");
	/// ```
	pub fn construct(
		class_path: impl Into<String>,
		args: Vec<Value>,
		kwargs: Map<String, Value>,
	) -> Self {
		ViewReference::Construct {
			class_path: class_path.into(),
			args,
			kwargs,
		}
	}

	/// Short name used in log and error messages.
	pub fn describe(&self) -> &str {
		match self {
			ViewReference::Direct(_) => "<direct view>",
			ViewReference::Lazy(path) => path,
			ViewReference::Construct { class_path, .. } => class_path,
		}
	}
}

impl fmt::Debug for ViewReference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ViewReference::Direct(_) => f.write_str("Direct(..)"),
			ViewReference::Lazy(path) => f.debug_tuple("Lazy").field(path).finish(),
			ViewReference::Construct {
				class_path,
				args,
				kwargs,
			} => f
				.debug_struct("Construct")
				.field("class_path", class_path)
				.field("args", args)
				.field("kwargs", kwargs)
				.finish(),
		}
	}
}

impl From<Arc<dyn View>> for ViewReference {
	fn from(view: Arc<dyn View>) -> Self {
		ViewReference::Direct(view)
	}
}

impl From<&str> for ViewReference {
	fn from(path: &str) -> Self {
		ViewReference::Lazy(path.to_string())
	}
}
