//! Maintenance configuration record
//!
//! There is exactly one record per site, stored under [`SETTINGS_KEY`].
//! Fields are private so the only ways to obtain a record are the defaults,
//! the sanitizer, and the `with_*` helpers, all of which keep the
//! administrator role in the bypass set.

use serde::Serialize;
use std::collections::BTreeSet;

use hiatus_types::auth_adapter::AuthCtx;

/// Fixed store key of the configuration record
pub const SETTINGS_KEY: &str = "maintenance.options";

/// Role that always bypasses the gate
pub const ADMIN_ROLE: &str = "administrator";

pub const DEFAULT_TITLE: &str = "We'll be back soon!";
pub const DEFAULT_CONTENT: &str =
	"Our website is currently undergoing scheduled maintenance. Thank you for your patience.";
pub const DEFAULT_BG_COLOR: &str = "#ffffff";
pub const DEFAULT_TEXT_COLOR: &str = "#333333";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
	pub(crate) enabled: bool,
	pub(crate) logo_url: String,
	pub(crate) title: String,
	pub(crate) content: String,
	#[serde(rename = "bg_color")]
	pub(crate) background_color: String,
	pub(crate) text_color: String,
	pub(crate) bypass_roles: BTreeSet<Box<str>>,
}

impl Default for Configuration {
	fn default() -> Self {
		Self {
			enabled: false,
			logo_url: String::new(),
			title: DEFAULT_TITLE.to_string(),
			content: DEFAULT_CONTENT.to_string(),
			background_color: DEFAULT_BG_COLOR.to_string(),
			text_color: DEFAULT_TEXT_COLOR.to_string(),
			bypass_roles: BTreeSet::from([Box::from(ADMIN_ROLE)]),
		}
	}
}

impl Configuration {
	pub fn enabled(&self) -> bool {
		self.enabled
	}

	pub fn logo_url(&self) -> &str {
		&self.logo_url
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn content(&self) -> &str {
		&self.content
	}

	pub fn background_color(&self) -> &str {
		&self.background_color
	}

	pub fn text_color(&self) -> &str {
		&self.text_color
	}

	pub fn bypass_roles(&self) -> &BTreeSet<Box<str>> {
		&self.bypass_roles
	}

	/// Checks whether the user holds any role exempt from the gate
	pub fn bypasses(&self, auth: &AuthCtx) -> bool {
		self.bypass_roles.iter().any(|role| auth.has_role(role))
	}

	pub fn with_enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	/// Replaces the bypass set. Entries go through the same role-key
	/// normalization as submitted settings; the administrator role is kept.
	pub fn with_bypass_roles<I, S>(mut self, roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.bypass_roles = super::sanitize::sanitize_roles(roles);
		self
	}

	/// Serializes the record into its stored (wire) form
	pub fn to_value(&self) -> serde_json::Value {
		serde_json::json!({
			"enabled": self.enabled,
			"logo_url": self.logo_url,
			"title": self.title,
			"content": self.content,
			"bg_color": self.background_color,
			"text_color": self.text_color,
			"bypass_roles": self.bypass_roles.iter().map(AsRef::as_ref).collect::<Vec<&str>>(),
		})
	}
}


// vim: ts=4
