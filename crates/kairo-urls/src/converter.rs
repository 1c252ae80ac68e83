//! Typed path parameters.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b'#')
	.add(b'%')
	.add(b'<')
	.add(b'>')
	.add(b'?')
	.add(b'`')
	.add(b'{')
	.add(b'}')
	.add(b'/');

/// Same as [`SEGMENT`] but keeps `/` intact
const PATH: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b'#')
	.add(b'%')
	.add(b'<')
	.add(b'>')
	.add(b'?')
	.add(b'`')
	.add(b'{')
	.add(b'}');

/// A converted path parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
	Str(String),
	Int(i64),
	Float(f64),
}

impl ParamValue {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			ParamValue::Str(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			ParamValue::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			ParamValue::Float(f) => Some(*f),
			_ => None,
		}
	}
}

impl fmt::Display for ParamValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ParamValue::Str(s) => f.write_str(s),
			ParamValue::Int(i) => write!(f, "{}", i),
			ParamValue::Float(v) if v.fract() == 0.0 => write!(f, "{:.1}", v),
			ParamValue::Float(v) => write!(f, "{}", v),
		}
	}
}

impl From<&str> for ParamValue {
	fn from(value: &str) -> Self {
		ParamValue::Str(value.to_string())
	}
}

impl From<String> for ParamValue {
	fn from(value: String) -> Self {
		ParamValue::Str(value)
	}
}

impl From<i64> for ParamValue {
	fn from(value: i64) -> Self {
		ParamValue::Int(value)
	}
}

impl From<f64> for ParamValue {
	fn from(value: f64) -> Self {
		ParamValue::Float(value)
	}
}

/// Parameters extracted from a matched URL, keyed by name
pub type ViewParams = HashMap<String, ParamValue>;

/// Conversion applied to a captured path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
	/// One path segment (default)
	String,
	/// Unsigned decimal integer
	Int,
	/// Decimal number with a fractional part
	Float,
	/// Remainder of the path, slashes included
	Path,
}

impl Converter {
	/// Look up a converter by the name used in patterns.
	///
	/// `*` is accepted as an alias of `path`.
	pub fn from_name(name: &str) -> Option<Self> {
		match name {
			"" | "string" | "default" => Some(Converter::String),
			"int" => Some(Converter::Int),
			"float" => Some(Converter::Float),
			"path" | "*" => Some(Converter::Path),
			_ => None,
		}
	}

	pub(crate) fn regex(self) -> &'static str {
		match self {
			Converter::String => "[^/]+",
			Converter::Int => r"\d+",
			Converter::Float => r"\d+\.\d+",
			Converter::Path => "[^/].*?",
		}
	}

	/// Convert a raw, still percent-encoded capture.
	///
	/// Returns `None` when the value does not fit the type (e.g. overflow).
	pub(crate) fn to_value(self, raw: &str) -> Option<ParamValue> {
		match self {
			Converter::String | Converter::Path => Some(ParamValue::Str(
				percent_decode_str(raw).decode_utf8_lossy().into_owned(),
			)),
			Converter::Int => raw.parse().ok().map(ParamValue::Int),
			Converter::Float => raw.parse().ok().map(ParamValue::Float),
		}
	}

	/// Render a value for URL building.
	pub(crate) fn to_url(self, value: &ParamValue) -> Option<String> {
		match (self, value) {
			(Converter::Int, ParamValue::Int(i)) if *i >= 0 => Some(i.to_string()),
			(Converter::Float, ParamValue::Float(_)) => Some(value.to_string()),
			(Converter::String, ParamValue::Str(s)) if !s.is_empty() => {
				Some(utf8_percent_encode(s, SEGMENT).to_string())
			}
			(Converter::Path, ParamValue::Str(s)) if !s.is_empty() => {
				Some(utf8_percent_encode(s, PATH).to_string())
			}
			(Converter::String, ParamValue::Int(_) | ParamValue::Float(_)) => {
				Some(value.to_string())
			}
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Converter::Int, "42", Some(ParamValue::Int(42)))]
	#[case(Converter::Int, "99999999999999999999", None)]
	#[case(Converter::Float, "1.5", Some(ParamValue::Float(1.5)))]
	#[case(Converter::String, "hello%20world", Some(ParamValue::Str("hello world".into())))]
	#[case(Converter::Path, "a/b%2Fc", Some(ParamValue::Str("a/b/c".into())))]
	fn test_to_value(
		#[case] converter: Converter,
		#[case] raw: &str,
		#[case] expected: Option<ParamValue>,
	) {
		assert_eq!(converter.to_value(raw), expected);
	}

	#[rstest]
	#[case(Converter::String, ParamValue::from("a b/c"), Some("a%20b%2Fc"))]
	#[case(Converter::Path, ParamValue::from("a b/c"), Some("a%20b/c"))]
	#[case(Converter::Int, ParamValue::Int(-1), None)]
	#[case(Converter::Float, ParamValue::Float(2.0), Some("2.0"))]
	#[case(Converter::Int, ParamValue::from("7"), None)]
	fn test_to_url(
		#[case] converter: Converter,
		#[case] value: ParamValue,
		#[case] expected: Option<&str>,
	) {
		assert_eq!(converter.to_url(&value).as_deref(), expected);
	}

	#[test]
	fn test_unknown_converter() {
		assert_eq!(Converter::from_name("uuid"), None);
		assert_eq!(Converter::from_name("*"), Some(Converter::Path));
	}
}
