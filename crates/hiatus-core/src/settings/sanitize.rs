//! Settings sanitizer
//!
//! Turns an untrusted settings submission into a complete [`Configuration`].
//! Nothing is ever rejected: each invalid field is replaced by its documented
//! default, independently of the other fields and of the previously stored
//! record.

use serde_json::Value;
use std::collections::BTreeSet;
use url::Url;

use super::html::{sanitize_html, strip_all_tags};
use super::types::{
	ADMIN_ROLE, Configuration, DEFAULT_BG_COLOR, DEFAULT_CONTENT, DEFAULT_TEXT_COLOR,
	DEFAULT_TITLE,
};

/// Form-style truthiness: `false`, `0`, `""`, `"0"`, `null` and empty
/// arrays are false, everything else is true.
fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
		Value::String(s) => !s.is_empty() && s != "0",
		Value::Array(items) => !items.is_empty(),
		Value::Object(_) => true,
	}
}

/// Reads a scalar field as text. Missing, null and structured values count
/// as absent.
fn text_field<'a>(raw: &'a Value, key: &str) -> Option<std::borrow::Cow<'a, str>> {
	match raw.get(key)? {
		Value::String(s) => Some(std::borrow::Cow::Borrowed(s.as_str())),
		Value::Number(n) => Some(std::borrow::Cow::Owned(n.to_string())),
		_ => None,
	}
}

/// Normalizes a logo URL. Only absolute http(s) URLs survive; a bare host
/// such as `example.com/logo.png` is read as `http://`.
pub fn sanitize_url(raw: &str) -> String {
	let cleaned: String = raw.chars().filter(|c| !c.is_control()).collect();
	let cleaned = cleaned.trim();
	if cleaned.is_empty() {
		return String::new();
	}

	let parsed = match Url::parse(cleaned) {
		Ok(url) => url,
		Err(url::ParseError::RelativeUrlWithoutBase)
			if !cleaned.starts_with(['/', '#', '?', '.']) =>
		{
			match Url::parse(&format!("http://{}", cleaned)) {
				Ok(url) => url,
				Err(_) => return String::new(),
			}
		}
		Err(_) => return String::new(),
	};

	if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none_or(str::is_empty) {
		return String::new();
	}
	parsed.to_string()
}

/// Accepts `#RRGGBB` (any case), anything else yields `fallback`
pub fn sanitize_color(raw: Option<&str>, fallback: &str) -> String {
	match raw {
		Some(color)
			if color.len() == 7
				&& color.starts_with('#')
				&& color[1..].bytes().all(|b| b.is_ascii_hexdigit()) =>
		{
			color.to_string()
		}
		_ => fallback.to_string(),
	}
}

/// Canonical role key: lowercase ASCII letters, digits, `_` and `-`
pub fn sanitize_role_key(raw: &str) -> Option<Box<str>> {
	let key: String = raw
		.chars()
		.filter_map(|c| {
			let c = c.to_ascii_lowercase();
			(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-').then_some(c)
		})
		.collect();
	(!key.is_empty()).then(|| key.into_boxed_str())
}

/// Normalizes and deduplicates role keys, always including the administrator
pub fn sanitize_roles<I, S>(roles: I) -> BTreeSet<Box<str>>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut set: BTreeSet<Box<str>> =
		roles.into_iter().filter_map(|role| sanitize_role_key(role.as_ref())).collect();
	set.insert(Box::from(ADMIN_ROLE));
	set
}

fn roles_field(raw: &Value) -> Vec<String> {
	match raw.get("bypass_roles") {
		Some(Value::Array(items)) => items
			.iter()
			.filter_map(|item| match item {
				Value::String(s) => Some(s.clone()),
				Value::Number(n) => Some(n.to_string()),
				_ => None,
			})
			.collect(),
		_ => Vec::new(),
	}
}

/// Coerces an untrusted settings map into a well-formed configuration.
///
/// Non-object input is treated as an empty submission.
pub fn sanitize(raw: &Value) -> Configuration {
	let enabled = raw.get("enabled").is_some_and(is_truthy);

	let logo_url = text_field(raw, "logo_url").map_or_else(String::new, |url| sanitize_url(&url));

	let title = text_field(raw, "title")
		.map_or_else(|| DEFAULT_TITLE.to_string(), |title| strip_all_tags(&title));

	let content = text_field(raw, "content")
		.map_or_else(|| DEFAULT_CONTENT.to_string(), |content| sanitize_html(&content));

	let background_color =
		sanitize_color(raw.get("bg_color").and_then(Value::as_str), DEFAULT_BG_COLOR);
	let text_color =
		sanitize_color(raw.get("text_color").and_then(Value::as_str), DEFAULT_TEXT_COLOR);

	let bypass_roles = sanitize_roles(roles_field(raw));

	Configuration {
		enabled,
		logo_url,
		title,
		content,
		background_color,
		text_color,
		bypass_roles,
	}
}


// vim: ts=4
