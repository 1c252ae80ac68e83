//! Path pattern compilation and matching.
//!
//! Patterns use brace placeholders:
//!
//! - `/users/` - exact match
//! - `/users/{name}/` - one path segment
//! - `/users/{id:int}/` - integer segment
//! - `/prices/{amount:float}` - decimal segment
//! - `/static/{file:path}` or `/static/{file:*}` - rest of the path
//!
//! A pattern ending in `/` also matches the same path without the slash;
//! such a match is flagged so the caller can redirect to the canonical URL.

use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

use crate::converter::{Converter, ViewParams};
use crate::error::{Result, UrlError};

const MAX_PATTERN_LENGTH: usize = 1024;

const MAX_PATH_SEGMENTS: usize = 32;

const MAX_REGEX_SIZE: usize = 1 << 20;

const SLASH_GROUP: &str = "__slash__";

#[derive(Debug, Clone, PartialEq)]
enum Part {
	Literal(String),
	Param { name: String, converter: Converter },
}

/// Result of matching a path against a pattern
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
	pub params: ViewParams,
	/// The path matched only after appending the pattern's trailing slash
	pub missing_slash: bool,
}

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
	pattern: String,
	regex: Regex,
	parts: Vec<Part>,
	strict_slash: bool,
}

impl PathPattern {
	/// Compile a pattern.
	///
	/// # Errors
	///
	/// Fails on patterns that are too long, too deep, malformed or that use
	/// an unknown converter.
	///
	/// # Examples
	///
	/// ```
	/// use kairo_urls::{ParamValue, PathPattern};
	///
	/// let pattern = PathPattern::new("/posts/{id:int}/").unwrap();
	/// let m = pattern.matches("/posts/7/").unwrap();
	/// assert_eq!(m.params["id"], ParamValue::Int(7));
	/// assert!(!m.missing_slash);
	///
	/// assert!(pattern.matches("/posts/7").unwrap().missing_slash);
	/// assert!(pattern.matches("/posts/seven/").is_none());
	/// ```
	pub fn new(pattern: &str) -> Result<Self> {
		if !pattern.starts_with('/') {
			return Err(UrlError::MissingLeadingSlash(pattern.to_string()));
		}
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(UrlError::PatternTooLong {
				length: pattern.len(),
				max: MAX_PATTERN_LENGTH,
			});
		}
		let segment_count = pattern.split('/').count();
		if segment_count > MAX_PATH_SEGMENTS {
			return Err(UrlError::TooManySegments {
				count: segment_count,
				max: MAX_PATH_SEGMENTS,
			});
		}

		let parts = parse(pattern)?;
		let strict_slash = pattern.len() > 1 && pattern.ends_with('/');

		let mut regex_str = String::from("^");
		for (index, part) in parts.iter().enumerate() {
			match part {
				Part::Literal(text) => {
					let is_last = index + 1 == parts.len();
					if strict_slash && is_last {
						regex_str.push_str(&regex::escape(&text[..text.len() - 1]));
						regex_str.push_str(&format!("(?P<{}>/?)", SLASH_GROUP));
					} else {
						regex_str.push_str(&regex::escape(text));
					}
				}
				Part::Param { name, converter } => {
					regex_str.push_str(&format!("(?P<{}>{})", name, converter.regex()));
				}
			}
		}
		regex_str.push('$');

		let regex = RegexBuilder::new(&regex_str)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| UrlError::Regex(e.to_string()))?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			parts,
			strict_slash,
		})
	}

	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Parameter names in declaration order.
	pub fn param_names(&self) -> impl Iterator<Item = &str> {
		self.parts.iter().filter_map(|part| match part {
			Part::Param { name, .. } => Some(name.as_str()),
			Part::Literal(_) => None,
		})
	}

	/// Match a path, converting the captured parameters.
	pub fn matches(&self, path: &str) -> Option<PatternMatch> {
		let caps = self.regex.captures(path)?;
		let mut params = ViewParams::new();
		for part in &self.parts {
			if let Part::Param { name, converter } = part {
				let raw = caps.name(name)?.as_str();
				params.insert(name.clone(), converter.to_value(raw)?);
			}
		}
		let missing_slash = self.strict_slash
			&& caps
				.name(SLASH_GROUP)
				.is_some_and(|slash| slash.as_str().is_empty());
		Some(PatternMatch {
			params,
			missing_slash,
		})
	}

	/// Build a path from parameter values.
	///
	/// Returns `None` when a parameter is missing or has the wrong type.
	pub fn build(&self, params: &ViewParams) -> Option<String> {
		let mut path = String::new();
		for part in &self.parts {
			match part {
				Part::Literal(text) => path.push_str(text),
				Part::Param { name, converter } => {
					path.push_str(&converter.to_url(params.get(name)?)?);
				}
			}
		}
		Some(path)
	}

	/// Whether every parameter of the pattern is provided by `params`.
	pub fn accepts(&self, params: &ViewParams) -> bool {
		self.param_names().all(|name| params.contains_key(name))
	}
}

fn parse(pattern: &str) -> Result<Vec<Part>> {
	let mut parts = Vec::new();
	let mut literal = String::new();
	let mut seen = HashSet::new();
	let mut rest = pattern;

	while let Some(start) = rest.find('{') {
		literal.push_str(&rest[..start]);
		let after = &rest[start + 1..];
		let end = after
			.find('}')
			.ok_or_else(|| UrlError::UnterminatedParameter(pattern.to_string()))?;
		let spec = &after[..end];
		let (name, converter_name) = spec.split_once(':').unwrap_or((spec, ""));
		let name = name.trim();

		if !is_valid_name(name) {
			return Err(UrlError::InvalidParameterName(name.to_string()));
		}
		if !seen.insert(name.to_string()) {
			return Err(UrlError::DuplicateParameter(name.to_string()));
		}
		let converter = Converter::from_name(converter_name.trim())
			.ok_or_else(|| UrlError::UnknownConverter(converter_name.to_string()))?;

		if !literal.is_empty() {
			parts.push(Part::Literal(std::mem::take(&mut literal)));
		}
		parts.push(Part::Param {
			name: name.to_string(),
			converter,
		});
		rest = &after[end + 1..];
	}
	literal.push_str(rest);
	if !literal.is_empty() {
		parts.push(Part::Literal(literal));
	}
	Ok(parts)
}

fn is_valid_name(name: &str) -> bool {
	let mut chars = name.chars();
	let starts_ok = chars
		.next()
		.is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
	starts_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && name != SLASH_GROUP
}
