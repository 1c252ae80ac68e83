//! Environment variable helpers.

/// Overrides `Settings::debug`
pub const DEBUG_ENV: &str = "KAIRO_DEBUG";

/// Overrides `Settings::server_software`
pub const SERVER_SOFTWARE_ENV: &str = "SERVER_SOFTWARE";

pub(crate) fn var(name: &str) -> Option<String> {
	std::env::var(name).ok()
}

/// Parse the usual spellings of a boolean flag.
///
/// # Examples
///
/// ```
/// use kairo_conf::parse_bool;
///
/// assert_eq!(parse_bool("Yes"), Some(true));
/// assert_eq!(parse_bool("0"), Some(false));
/// assert_eq!(parse_bool("maybe"), None);
/// ```
pub fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" | "" => Some(false),
		_ => None,
	}
}
