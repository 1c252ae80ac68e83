use kairo_i18n::{PoDirectoryLoader, TranslationCache, TranslationLoader};
use rstest::{fixture, rstest};
use std::fs;
use tempfile::TempDir;

#[fixture]
fn locale_dir() -> TempDir {
	let dir = TempDir::new().unwrap();
	let messages = dir.path().join("ja").join("LC_MESSAGES");
	fs::create_dir_all(&messages).unwrap();
	fs::write(
		messages.join("messages.po"),
		"msgid \"\"\nmsgstr \"\"\n\"Language: ja\\n\"\n\nmsgid \"Hello\"\nmsgstr \"こんにちは\"\n",
	)
	.unwrap();
	dir
}

#[rstest]
fn test_directory_loader_reads_po_file(locale_dir: TempDir) {
	let loader = PoDirectoryLoader::new(locale_dir.path());
	let catalog = loader.load("ja").unwrap();
	assert_eq!(catalog.gettext("Hello"), "こんにちは");
	assert_eq!(catalog.locale(), Some("ja"));
}

#[rstest]
fn test_cache_keys_by_app_and_language(locale_dir: TempDir) {
	let loader = PoDirectoryLoader::new(locale_dir.path());
	let cache = TranslationCache::new();

	let first = cache.get_or_load("blog", "ja", &loader);
	let again = cache.get_or_load("blog", "ja", &loader);
	let other_app = cache.get_or_load("wiki", "ja", &loader);
	let missing = cache.get_or_load("blog", "de", &loader);

	assert!(std::sync::Arc::ptr_eq(&first, &again));
	assert!(!std::sync::Arc::ptr_eq(&first, &other_app));
	assert!(missing.is_empty());
	assert_eq!(missing.gettext("Hello"), "Hello");
	assert_eq!(cache.len(), 3);
}
