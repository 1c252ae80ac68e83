//! Symbol and endpoint registries.
//!
//! The [`SymbolRegistry`] replaces importing objects by dotted path: views,
//! view classes and plain values are registered under a name and looked up
//! when a [`ViewReference`] is resolved.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, ViewResolutionError};
use crate::{View, ViewReference};

/// A constructor for views, instantiated with positional and keyword
/// arguments.
pub trait ViewClass: Send + Sync {
	/// # Errors
	///
	/// Returns an error when the arguments are unusable.
	fn instantiate(&self, args: &[Value], kwargs: &Map<String, Value>) -> anyhow::Result<Symbol>;
}

impl<F> ViewClass for F
where
	F: Fn(&[Value], &Map<String, Value>) -> anyhow::Result<Symbol> + Send + Sync,
{
	fn instantiate(&self, args: &[Value], kwargs: &Map<String, Value>) -> anyhow::Result<Symbol> {
		self(args, kwargs)
	}
}

/// Anything registered under a dotted name.
#[derive(Clone)]
pub enum Symbol {
	View(Arc<dyn View>),
	Class(Arc<dyn ViewClass>),
	/// A non-callable value
	Value(Value),
}

impl Symbol {
	pub fn kind(&self) -> &'static str {
		match self {
			Symbol::View(_) => "view",
			Symbol::Class(_) => "class",
			Symbol::Value(_) => "value",
		}
	}
}

/// Name to [`Symbol`] table.
#[derive(Clone, Default)]
pub struct SymbolRegistry {
	symbols: HashMap<String, Symbol>,
}

impl SymbolRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, path: impl Into<String>, symbol: Symbol) {
		self.symbols.insert(path.into(), symbol);
	}

	pub fn register_view(&mut self, path: impl Into<String>, view: Arc<dyn View>) {
		self.register(path, Symbol::View(view));
	}

	pub fn register_class<C>(&mut self, path: impl Into<String>, class: C)
	where
		C: ViewClass + 'static,
	{
		self.register(path, Symbol::Class(Arc::new(class)));
	}

	pub fn register_value(&mut self, path: impl Into<String>, value: Value) {
		self.register(path, Symbol::Value(value));
	}

	pub fn get(&self, path: &str) -> Option<&Symbol> {
		self.symbols.get(path)
	}

	pub fn contains(&self, path: &str) -> bool {
		self.symbols.contains_key(path)
	}

	/// Resolve a reference to a callable view.
	///
	/// `Construct` references instantiate their class on every call.
	///
	/// # Errors
	///
	/// - [`ViewResolutionError::ImportFailed`] when the path is not registered
	/// - [`ViewResolutionError::NotCallable`] when the symbol (or the
	///   constructed instance) is not a view
	/// - [`ViewResolutionError::Construction`] when instantiation fails
	pub fn resolve(&self, reference: &ViewReference) -> Result<Arc<dyn View>> {
		match reference {
			ViewReference::Direct(view) => Ok(Arc::clone(view)),
			ViewReference::Lazy(path) => match self.get(path) {
				Some(Symbol::View(view)) => Ok(Arc::clone(view)),
				Some(_) => Err(ViewResolutionError::NotCallable(path.clone())),
				None => Err(ViewResolutionError::ImportFailed(path.clone())),
			},
			ViewReference::Construct {
				class_path,
				args,
				kwargs,
			} => {
				let class = match self.get(class_path) {
					Some(Symbol::Class(class)) => class,
					Some(_) => return Err(ViewResolutionError::NotCallable(class_path.clone())),
					None => return Err(ViewResolutionError::ImportFailed(class_path.clone())),
				};
				match class.instantiate(args, kwargs) {
					Ok(Symbol::View(view)) => Ok(view),
					Ok(_) => Err(ViewResolutionError::NotCallable(class_path.clone())),
					Err(source) => Err(ViewResolutionError::Construction {
						class_path: class_path.clone(),
						source,
					}),
				}
			}
		}
	}
}

/// Endpoint to [`ViewReference`] table.
#[derive(Clone, Debug, Default)]
pub struct ViewRegistry {
	views: HashMap<String, ViewReference>,
}

impl ViewRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, endpoint: impl Into<String>, reference: impl Into<ViewReference>) {
		self.views.insert(endpoint.into(), reference.into());
	}

	pub fn extend(&mut self, views: impl IntoIterator<Item = (String, ViewReference)>) {
		self.views.extend(views);
	}

	pub fn get(&self, endpoint: &str) -> Option<&ViewReference> {
		self.views.get(endpoint)
	}

	pub fn contains(&self, endpoint: &str) -> bool {
		self.views.contains_key(endpoint)
	}

	pub fn len(&self) -> usize {
		self.views.len()
	}

	pub fn is_empty(&self) -> bool {
		self.views.is_empty()
	}

	/// Resolve the view for `endpoint`.
	///
	/// # Errors
	///
	/// [`ViewResolutionError::UnknownEndpoint`] when nothing is registered for
	/// the endpoint, otherwise the errors of [`SymbolRegistry::resolve`].
	pub fn resolve(&self, endpoint: &str, symbols: &SymbolRegistry) -> Result<Arc<dyn View>> {
		let reference = self
			.get(endpoint)
			.ok_or_else(|| ViewResolutionError::UnknownEndpoint(endpoint.to_string()))?;
		symbols.resolve(reference)
	}
}
