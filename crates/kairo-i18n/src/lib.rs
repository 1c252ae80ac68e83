//! # Kairo i18n
//!
//! Message catalogs, translation loaders, the per-application translation
//! cache and request language negotiation.

pub mod cache;
pub mod catalog;
pub mod loader;
pub mod negotiation;

pub use cache::TranslationCache;
pub use catalog::MessageCatalog;
pub use loader::{LoadError, PoDirectoryLoader, StaticLoader, TranslationLoader, parse_po};
pub use negotiation::{LANG_PARAM, get_language_from_request};
