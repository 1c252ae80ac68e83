use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{LoadError, MessageCatalog, TranslationLoader};

/// Loaded catalogs keyed by `(app name, language)`.
///
/// Entries are loaded on first use and never invalidated. Two requests
/// loading the same key concurrently both load; the last insert wins.
#[derive(Debug, Default)]
pub struct TranslationCache {
	catalogs: RwLock<HashMap<(String, String), Arc<MessageCatalog>>>,
}

impl TranslationCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Cached catalog for `(app, lang)`, loading it on a miss.
	///
	/// A language without translations is cached as an empty catalog for
	/// that language; other load failures are logged and not cached.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_i18n::{MessageCatalog, StaticLoader, TranslationCache};
	///
	/// let mut fr = MessageCatalog::new("fr");
	/// fr.add_translation("Hello", "Bonjour");
	/// let loader = StaticLoader::new().with_catalog(fr);
	///
	/// let cache = TranslationCache::new();
	/// let catalog = cache.get_or_load("blog", "fr", &loader);
	/// assert_eq!(catalog.gettext("Hello"), "Bonjour");
	/// assert_eq!(cache.len(), 1);
	/// ```
	pub fn get_or_load(
		&self,
		app: &str,
		lang: &str,
		loader: &dyn TranslationLoader,
	) -> Arc<MessageCatalog> {
		let key = (app.to_string(), lang.to_string());
		if let Some(catalog) = self.catalogs.read().get(&key) {
			return Arc::clone(catalog);
		}

		let catalog = match loader.load(lang) {
			Ok(catalog) => Arc::new(catalog),
			Err(LoadError::NotFound(_)) => Arc::new(MessageCatalog::new(lang)),
			Err(err) => {
				tracing::warn!(app, lang, error = %err, "failed to load translations");
				return Arc::new(MessageCatalog::new(lang));
			}
		};
		self.catalogs.write().insert(key, Arc::clone(&catalog));
		catalog
	}

	pub fn len(&self) -> usize {
		self.catalogs.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.catalogs.read().is_empty()
	}
}
