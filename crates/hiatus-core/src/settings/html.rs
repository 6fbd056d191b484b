//! Allowlist HTML sanitization for the maintenance message
//!
//! The message is rich text written by an operator but emitted verbatim into
//! the page, so only a small set of formatting tags survives:
//! - executable and embedding elements are removed with their content
//! - comments are removed
//! - other unknown tags are dropped, their text is kept
//! - attributes are filtered per tag, URL attributes must use a safe scheme
//! - stray `<` and `>` in text are escaped
//! - open tags are closed, orphan closing tags are dropped
//!
//! The output of [`sanitize_html`] is a fixed point: sanitizing it again
//! yields the same string.

use regex::Regex;
use std::sync::LazyLock;

/// Elements removed together with everything inside them
const STRIPPED_ELEMENTS: &str = "script|style|iframe|frame|frameset|object|embed|applet|noscript|noembed|template|svg|math|textarea|select|xmp";

const ALLOWED_TAGS: &[&str] = &[
	"a",
	"abbr",
	"b",
	"blockquote",
	"br",
	"caption",
	"cite",
	"code",
	"del",
	"div",
	"em",
	"figcaption",
	"figure",
	"h1",
	"h2",
	"h3",
	"h4",
	"h5",
	"h6",
	"hr",
	"i",
	"img",
	"ins",
	"li",
	"mark",
	"ol",
	"p",
	"pre",
	"q",
	"s",
	"small",
	"span",
	"strong",
	"sub",
	"sup",
	"table",
	"tbody",
	"td",
	"tfoot",
	"th",
	"thead",
	"tr",
	"u",
	"ul",
];

const VOID_TAGS: &[&str] = &["br", "hr", "img"];

const GLOBAL_ATTRS: &[&str] = &["class", "title", "lang", "dir"];

const URL_ATTRS: &[&str] = &["href", "src", "cite"];

const SAFE_URL_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

static STRIPPED_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
	Regex::new(&format!(
		r"(?is)<({})\b[^>]*>.*?</({})\s*>",
		STRIPPED_ELEMENTS, STRIPPED_ELEMENTS
	))
	.ok()
});

static COMMENT_RE: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").ok());

static TAG_RE: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)([^<>]*)>").ok());

static ATTR_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
	Regex::new(
		r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#,
	)
	.ok()
});

static ANY_TAG_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").ok());

fn allowed_tag(name: &str) -> Option<&'static str> {
	ALLOWED_TAGS.iter().copied().find(|tag| *tag == name)
}

fn allowed_attr(tag: &str, attr: &str) -> bool {
	if GLOBAL_ATTRS.contains(&attr) {
		return true;
	}
	match tag {
		"a" => matches!(attr, "href" | "target" | "rel"),
		"img" => matches!(attr, "src" | "alt" | "width" | "height" | "loading"),
		"blockquote" | "q" | "del" | "ins" => attr == "cite",
		"ol" => matches!(attr, "start" | "reversed"),
		"td" | "th" => matches!(attr, "colspan" | "rowspan"),
		_ => false,
	}
}

/// Checks a URL attribute value against the scheme allowlist.
///
/// Browsers ignore whitespace and control characters inside a scheme and
/// decode entities in attribute values, so those are stripped before the
/// check and any `&` before the first path delimiter rejects the value.
pub fn is_safe_url(value: &str) -> bool {
	let normalized: String = value
		.chars()
		.filter(|c| !c.is_whitespace() && !c.is_control())
		.collect::<String>()
		.to_ascii_lowercase();
	let head = normalized.split(['/', '?', '#']).next().unwrap_or_default();

	if head.contains('&') {
		return false;
	}
	match head.split_once(':') {
		Some((scheme, _)) => SAFE_URL_SCHEMES.contains(&scheme),
		None => true,
	}
}

fn escape_text(text: &str, out: &mut String) {
	for c in text.chars() {
		match c {
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			_ => out.push(c),
		}
	}
}

fn escape_attr(value: &str, out: &mut String) {
	for c in value.chars() {
		match c {
			'"' => out.push_str("&quot;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			_ => out.push(c),
		}
	}
}

fn write_open_tag(tag: &str, attr_src: &str, attr_re: &Regex, out: &mut String) {
	out.push('<');
	out.push_str(tag);

	let mut seen: Vec<String> = Vec::new();
	for cap in attr_re.captures_iter(attr_src) {
		let Some(name) = cap.get(1) else { continue };
		let name = name.as_str().to_ascii_lowercase();
		if !allowed_attr(tag, &name) || seen.contains(&name) {
			continue;
		}
		let value = cap
			.get(2)
			.or_else(|| cap.get(3))
			.or_else(|| cap.get(4))
			.map_or("", |m| m.as_str());
		if URL_ATTRS.contains(&name.as_str()) && !is_safe_url(value) {
			continue;
		}

		out.push(' ');
		out.push_str(&name);
		out.push_str("=\"");
		escape_attr(value, out);
		out.push('"');
		seen.push(name);
	}

	out.push('>');
}

fn close_tags(open: &mut Vec<&'static str>, from: usize, out: &mut String) {
	for tag in open.drain(from..).rev() {
		out.push_str("</");
		out.push_str(tag);
		out.push('>');
	}
}

fn escape_all(html: &str) -> String {
	let mut out = String::with_capacity(html.len());
	escape_text(html, &mut out);
	out
}

/// Reduces untrusted markup to the allowed formatting subset
pub fn sanitize_html(html: &str) -> String {
	let (Some(stripped_re), Some(comment_re), Some(tag_re), Some(attr_re)) =
		(&*STRIPPED_RE, &*COMMENT_RE, &*TAG_RE, &*ATTR_RE)
	else {
		// Without the tokenizer nothing can be kept as markup
		tracing::error!("HTML sanitizer patterns unavailable, escaping message");
		return escape_all(html);
	};

	let without_comments = comment_re.replace_all(html, "");
	let input = stripped_re.replace_all(&without_comments, "");

	let mut out = String::with_capacity(input.len());
	let mut open: Vec<&'static str> = Vec::new();
	let mut last = 0;

	for cap in tag_re.captures_iter(&input) {
		let Some(whole) = cap.get(0) else { continue };
		escape_text(&input[last..whole.start()], &mut out);
		last = whole.end();

		let closing = cap.get(1).is_some_and(|m| !m.as_str().is_empty());
		let name = cap.get(2).map_or(String::new(), |m| m.as_str().to_ascii_lowercase());
		let Some(tag) = allowed_tag(&name) else { continue };
		let is_void = VOID_TAGS.contains(&tag);

		if closing {
			if is_void {
				continue;
			}
			if let Some(pos) = open.iter().rposition(|t| *t == tag) {
				close_tags(&mut open, pos, &mut out);
			}
		} else {
			write_open_tag(tag, cap.get(3).map_or("", |m| m.as_str()), attr_re, &mut out);
			if !is_void {
				open.push(tag);
			}
		}
	}
	escape_text(&input[last..], &mut out);
	close_tags(&mut open, 0, &mut out);

	out
}

/// Removes all markup, leaving plain text with collapsed whitespace
pub fn strip_all_tags(text: &str) -> String {
	let stripped = match (&*COMMENT_RE, &*STRIPPED_RE, &*ANY_TAG_RE) {
		(Some(comment_re), Some(stripped_re), Some(any_tag_re)) => {
			let text = comment_re.replace_all(text, "");
			let text = stripped_re.replace_all(&text, "");
			any_tag_re.replace_all(&text, "").into_owned()
		}
		_ => {
			tracing::error!("HTML sanitizer patterns unavailable, dropping angle brackets");
			text.replace(['<', '>'], "")
		}
	};

	stripped
		.split(|c: char| c.is_whitespace() || c.is_control())
		.filter(|part| !part.is_empty())
		.collect::<Vec<_>>()
		.join(" ")
}


// vim: ts=4
