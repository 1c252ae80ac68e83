//! Per-request language selection.

use kairo_http::Request;

/// Query parameter and cookie naming an explicit language choice
pub const LANG_PARAM: &str = "hl";

#[derive(Debug, Clone, PartialEq)]
struct Preference {
	tag: String,
	quality: f32,
}

fn parse_accept_language(header: &str) -> Vec<Preference> {
	let mut preferences: Vec<Preference> = header
		.split(',')
		.filter_map(|item| {
			let mut parts = item.split(';');
			let tag = parts.next()?.trim().to_ascii_lowercase().replace('_', "-");
			if tag.is_empty() {
				return None;
			}
			let mut quality = 1.0;
			for param in parts {
				if let Some((key, value)) = param.trim().split_once('=')
					&& key.trim() == "q"
					&& let Ok(q) = value.trim().parse::<f32>()
				{
					quality = q.clamp(0.0, 1.0);
				}
			}
			(quality > 0.0).then_some(Preference { tag, quality })
		})
		.collect();
	// Stable sort keeps header order among equal qualities.
	preferences.sort_by(|a, b| b.quality.total_cmp(&a.quality));
	preferences
}

/// Pick the supported language matching `tag`, trying the primary subtag
/// when the full tag is not supported.
fn match_supported(tag: &str, supported: &[String]) -> Option<String> {
	let normalized = tag.to_ascii_lowercase().replace('_', "-");
	let primary = normalized.split('-').next().unwrap_or(&normalized);
	supported
		.iter()
		.find(|lang| lang.to_ascii_lowercase().replace('_', "-") == normalized)
		.or_else(|| {
			supported
				.iter()
				.find(|lang| lang.to_ascii_lowercase().replace('_', "-") == primary)
		})
		.cloned()
}

/// Language requested by the client, restricted to `supported`.
///
/// Checks, in order, the `hl` query parameter, the `hl` cookie and the
/// `Accept-Language` header. Tags outside `supported` are ignored, so an
/// empty list matches nothing. Returns `None` when nothing usable was
/// requested.
///
/// # Examples
///
/// ```
/// use kairo_i18n::get_language_from_request;
/// use kairo_http::Request;
///
/// let supported = vec!["en".to_string(), "ja".to_string()];
/// let request = Request::builder()
///     .uri("/")
///     .header("accept-language", "fr;q=1.0, ja-JP;q=0.8, en;q=0.5")
///     .build()
///     .unwrap();
/// assert_eq!(get_language_from_request(&request, &supported).as_deref(), Some("ja"));
/// ```
pub fn get_language_from_request(request: &Request, supported: &[String]) -> Option<String> {
	if let Some(lang) = request
		.query(LANG_PARAM)
		.and_then(|lang| match_supported(lang, supported))
	{
		return Some(lang);
	}
	if let Some(lang) = request
		.cookie(LANG_PARAM)
		.and_then(|lang| match_supported(&lang, supported))
	{
		return Some(lang);
	}
	let header = request
		.headers
		.get("accept-language")
		.and_then(|value| value.to_str().ok())?;
	parse_accept_language(header)
		.iter()
		.find_map(|preference| match_supported(&preference.tag, supported))
}
