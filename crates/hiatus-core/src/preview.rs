//! Preview bypass
//!
//! Lets an operator holding [`MANAGE_SETTINGS`] see the maintenance page on
//! any URL by adding the [`PREVIEW_PARAM`] query parameter, whether or not
//! the gate is enabled. Without the capability the marker is ignored and the
//! request continues to the gate as if no preview was asked for.

use hiatus_types::auth_adapter::AuthCtx;

/// Reserved query parameter, any value activates the preview
pub const PREVIEW_PARAM: &str = "maintenance_preview";

/// Capability required to preview and to change the settings
pub const MANAGE_SETTINGS: &str = "manage_settings";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewDecision {
	Render,
	Ignore,
}

pub fn has_preview_marker(query: Option<&str>) -> bool {
	query.is_some_and(|query| {
		url::form_urlencoded::parse(query.as_bytes()).any(|(key, _)| key == PREVIEW_PARAM)
	})
}

pub fn check(query: Option<&str>, auth: Option<&AuthCtx>) -> PreviewDecision {
	if !has_preview_marker(query) {
		return PreviewDecision::Ignore;
	}
	if auth.is_some_and(|auth| auth.has_capability(MANAGE_SETTINGS)) {
		PreviewDecision::Render
	} else {
		PreviewDecision::Ignore
	}
}


// vim: ts=4
