use kairo_exception::Result;
use std::collections::HashMap;
use std::sync::Arc;

use crate::Middleware;
use crate::logging::LoggingMiddleware;

/// Zero-argument middleware constructor.
///
/// Returning [`Error::MiddlewareNotUsed`](kairo_exception::Error::MiddlewareNotUsed)
/// removes the component from the pipeline.
pub type MiddlewareFactory = Arc<dyn Fn() -> Result<Arc<dyn Middleware>> + Send + Sync>;

/// Identifier to factory table.
#[derive(Clone, Default)]
pub struct MiddlewareRegistry {
	factories: HashMap<String, MiddlewareFactory>,
}

impl MiddlewareRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry preloaded with the built-in middleware.
	pub fn with_builtins() -> Self {
		let mut registry = Self::new();
		registry.register_default::<LoggingMiddleware>(LoggingMiddleware::IDENTIFIER);
		registry
	}

	/// Register a factory under `id`, replacing any previous one.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_middleware::{LoggingMiddleware, MiddlewareRegistry};
	/// use std::sync::Arc;
	///
	/// let mut registry = MiddlewareRegistry::new();
	/// registry.register("site.middleware.Logging", || Ok(Arc::new(LoggingMiddleware::new())));
	/// assert!(registry.contains("site.middleware.Logging"));
	/// ```
	pub fn register<F>(&mut self, id: impl Into<String>, factory: F)
	where
		F: Fn() -> Result<Arc<dyn Middleware>> + Send + Sync + 'static,
	{
		self.factories.insert(id.into(), Arc::new(factory));
	}

	/// Register a middleware constructed through `Default`.
	pub fn register_default<M>(&mut self, id: impl Into<String>)
	where
		M: Middleware + Default + 'static,
	{
		self.register(id, || Ok(Arc::new(M::default()) as Arc<dyn Middleware>));
	}

	pub fn get(&self, id: &str) -> Option<&MiddlewareFactory> {
		self.factories.get(id)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.factories.contains_key(id)
	}
}
