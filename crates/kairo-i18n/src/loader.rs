//! Translation loading.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use thiserror::Error;

use crate::MessageCatalog;

/// Errors raised while loading a catalog
#[derive(Debug, Error)]
pub enum LoadError {
	#[error("No translations for language `{0}`")]
	NotFound(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error at line {line}: {message}")]
	Parse { line: usize, message: String },
}

/// Source of message catalogs.
pub trait TranslationLoader: Send + Sync {
	/// # Errors
	///
	/// Returns [`LoadError::NotFound`] when no catalog exists for `lang`.
	fn load(&self, lang: &str) -> Result<MessageCatalog, LoadError>;
}

/// Loader backed by catalogs built in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
	catalogs: HashMap<String, MessageCatalog>,
}

impl StaticLoader {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_catalog(mut self, catalog: MessageCatalog) -> Self {
		if let Some(locale) = catalog.locale() {
			self.catalogs.insert(locale.to_string(), catalog);
		}
		self
	}
}

impl TranslationLoader for StaticLoader {
	fn load(&self, lang: &str) -> Result<MessageCatalog, LoadError> {
		self.catalogs
			.get(lang)
			.cloned()
			.ok_or_else(|| LoadError::NotFound(lang.to_string()))
	}
}

/// Loader reading `{root}/{lang}/LC_MESSAGES/{domain}.po`.
#[derive(Debug, Clone)]
pub struct PoDirectoryLoader {
	root: PathBuf,
	domain: String,
}

impl PoDirectoryLoader {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
			domain: "messages".to_string(),
		}
	}

	pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
		self.domain = domain.into();
		self
	}

	fn path_for(&self, lang: &str) -> PathBuf {
		self.root
			.join(lang)
			.join("LC_MESSAGES")
			.join(format!("{}.po", self.domain))
	}
}

impl TranslationLoader for PoDirectoryLoader {
	fn load(&self, lang: &str) -> Result<MessageCatalog, LoadError> {
		let path = self.path_for(lang);
		if !path.is_file() {
			return Err(LoadError::NotFound(lang.to_string()));
		}
		parse_po(std::fs::File::open(path)?, lang)
	}
}

#[derive(Default)]
struct Entry {
	msgid: String,
	msgid_plural: Option<String>,
	msgstr: Vec<String>,
}

#[derive(Clone, Copy)]
enum Field {
	Id,
	IdPlural,
	Str(usize),
}

/// Parse a gettext `.po` document.
///
/// # Examples
///
/// ```
/// use kairo_i18n::parse_po;
///
/// let po = r#"
/// msgid "Hello"
/// msgstr "Bonjour"
///
/// msgid "file"
/// msgid_plural "files"
/// msgstr[0] "fichier"
/// msgstr[1] "fichiers"
/// "#;
/// let catalog = parse_po(po.as_bytes(), "fr").unwrap();
/// assert_eq!(catalog.gettext("Hello"), "Bonjour");
/// assert_eq!(catalog.ngettext("file", "files", 3), "fichiers");
/// ```
pub fn parse_po<R: Read>(reader: R, locale: &str) -> Result<MessageCatalog, LoadError> {
	let mut catalog = MessageCatalog::new(locale);
	let mut entry = Entry::default();
	let mut field: Option<Field> = None;

	for (index, line) in BufReader::new(reader).lines().enumerate() {
		let line = line?;
		let line = line.trim();
		let line_no = index + 1;

		if line.is_empty() || line.starts_with('#') {
			continue;
		}

		if let Some(rest) = line.strip_prefix("msgid_plural ") {
			entry.msgid_plural = Some(unquote(rest, line_no)?);
			field = Some(Field::IdPlural);
		} else if let Some(rest) = line.strip_prefix("msgid ") {
			flush(&mut catalog, std::mem::take(&mut entry));
			entry.msgid = unquote(rest, line_no)?;
			field = Some(Field::Id);
		} else if let Some(rest) = line.strip_prefix("msgstr[") {
			let (idx, value) = rest.split_once(']').ok_or_else(|| LoadError::Parse {
				line: line_no,
				message: "unterminated plural index".to_string(),
			})?;
			let idx: usize = idx.parse().map_err(|_| LoadError::Parse {
				line: line_no,
				message: format!("invalid plural index `{}`", idx),
			})?;
			if entry.msgstr.len() <= idx {
				entry.msgstr.resize(idx + 1, String::new());
			}
			entry.msgstr[idx] = unquote(value.trim(), line_no)?;
			field = Some(Field::Str(idx));
		} else if let Some(rest) = line.strip_prefix("msgstr ") {
			entry.msgstr = vec![unquote(rest, line_no)?];
			field = Some(Field::Str(0));
		} else if line.starts_with('"') {
			let text = unquote(line, line_no)?;
			match field {
				Some(Field::Id) => entry.msgid.push_str(&text),
				Some(Field::IdPlural) => {
					if let Some(plural) = entry.msgid_plural.as_mut() {
						plural.push_str(&text);
					}
				}
				Some(Field::Str(idx)) => entry.msgstr[idx].push_str(&text),
				None => {
					return Err(LoadError::Parse {
						line: line_no,
						message: "continuation line without keyword".to_string(),
					});
				}
			}
		} else {
			return Err(LoadError::Parse {
				line: line_no,
				message: format!("unexpected line `{}`", line),
			});
		}
	}
	flush(&mut catalog, entry);
	Ok(catalog)
}

fn flush(catalog: &mut MessageCatalog, entry: Entry) {
	// The empty msgid carries the catalog header.
	if entry.msgid.is_empty() {
		return;
	}
	if entry.msgid_plural.is_some() {
		catalog.add_plural(entry.msgid, entry.msgstr);
	} else if let Some(translation) = entry.msgstr.into_iter().next() {
		catalog.add_translation(entry.msgid, translation);
	}
}

fn unquote(value: &str, line: usize) -> Result<String, LoadError> {
	let inner = value
		.trim()
		.strip_prefix('"')
		.and_then(|v| v.strip_suffix('"'))
		.ok_or_else(|| LoadError::Parse {
			line,
			message: "expected a quoted string".to_string(),
		})?;

	let mut out = String::with_capacity(inner.len());
	let mut chars = inner.chars();
	while let Some(c) = chars.next() {
		if c != '\\' {
			out.push(c);
			continue;
		}
		match chars.next() {
			Some('n') => out.push('\n'),
			Some('t') => out.push('\t'),
			Some('"') => out.push('"'),
			Some('\\') => out.push('\\'),
			Some(other) => {
				out.push('\\');
				out.push(other);
			}
			None => out.push('\\'),
		}
	}
	Ok(out)
}
