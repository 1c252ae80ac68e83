//! Message catalog for storing translations

use std::collections::HashMap;

/// Translations for one language.
///
/// A catalog without a locale is the null catalog: every lookup falls
/// back to the untranslated message.
///
/// # Example
/// ```
/// use kairo_i18n::MessageCatalog;
///
/// let mut catalog = MessageCatalog::new("fr");
/// catalog.add_translation("Hello", "Bonjour");
/// catalog.add_plural("item", vec!["article".into(), "articles".into()]);
///
/// assert_eq!(catalog.gettext("Hello"), "Bonjour");
/// assert_eq!(catalog.gettext("Goodbye"), "Goodbye");
/// assert_eq!(catalog.ngettext("item", "items", 0), "article");
/// assert_eq!(catalog.ngettext("item", "items", 5), "articles");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageCatalog {
	locale: Option<String>,
	messages: HashMap<String, String>,
	plurals: HashMap<String, Vec<String>>,
}

impl MessageCatalog {
	pub fn new(locale: &str) -> Self {
		Self {
			locale: Some(locale.to_string()),
			..Self::default()
		}
	}

	/// Catalog used when internationalization is disabled
	pub fn null() -> Self {
		Self::default()
	}

	pub fn locale(&self) -> Option<&str> {
		self.locale.as_deref()
	}

	pub fn is_null(&self) -> bool {
		self.locale.is_none()
	}

	pub fn len(&self) -> usize {
		self.messages.len() + self.plurals.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn add_translation(&mut self, message: impl Into<String>, translation: impl Into<String>) {
		self.messages.insert(message.into(), translation.into());
	}

	pub fn add_plural(&mut self, singular: impl Into<String>, forms: Vec<String>) {
		self.plurals.insert(singular.into(), forms);
	}

	/// Translate `message`, falling back to the message itself.
	pub fn gettext<'a>(&'a self, message: &'a str) -> &'a str {
		self.messages
			.get(message)
			.filter(|t| !t.is_empty())
			.map(String::as_str)
			.unwrap_or(message)
	}

	/// Translate a countable message.
	pub fn ngettext<'a>(&'a self, singular: &'a str, plural: &'a str, count: u64) -> &'a str {
		let translated = self
			.plurals
			.get(singular)
			.and_then(|forms| forms.get(self.plural_form(count)))
			.filter(|t| !t.is_empty());
		match translated {
			Some(form) => form,
			None if count == 1 => singular,
			None => plural,
		}
	}

	/// Plural form index for `count` under the catalog language's rules
	fn plural_form(&self, count: u64) -> usize {
		let locale = self.locale.as_deref().unwrap_or("en");
		let lang = locale.split(['-', '_']).next().unwrap_or(locale);

		match lang {
			"ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" | "tr" => 0,
			"fr" => usize::from(count > 1),
			"ru" | "uk" | "be" | "sr" | "hr" | "bs" => {
				let n100 = count % 100;
				let n10 = count % 10;
				if n10 == 1 && n100 != 11 {
					0
				} else if (2..=4).contains(&n10) && !(10..20).contains(&n100) {
					1
				} else {
					2
				}
			}
			"pl" => {
				let n100 = count % 100;
				let n10 = count % 10;
				if count == 1 {
					0
				} else if (2..=4).contains(&n10) && !(10..20).contains(&n100) {
					1
				} else {
					2
				}
			}
			_ => usize::from(count != 1),
		}
	}
}
