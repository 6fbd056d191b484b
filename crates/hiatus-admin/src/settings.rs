//! Settings read and update endpoints

use axum::{Json, extract::State};
use serde::Serialize;

use hiatus_core::extract::Auth;
use hiatus_core::preview::PREVIEW_PARAM;

use crate::prelude::*;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
	/// Stored record in wire form
	pub settings: serde_json::Value,
	/// Whether visitors currently get the maintenance page
	pub active: bool,
	pub preview_url: String,
}

fn preview_url() -> String {
	format!("/?{}=1", PREVIEW_PARAM)
}

/// GET /api/maintenance/settings
pub async fn get_settings(State(app): State<App>) -> ClResult<Json<SettingsView>> {
	let config = app.settings.load().await;

	Ok(Json(SettingsView {
		settings: config.to_value(),
		active: config.enabled(),
		preview_url: preview_url(),
	}))
}

/// PUT /api/maintenance/settings - Replace the settings with a sanitized submission
pub async fn put_settings(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(body): Json<serde_json::Value>,
) -> ClResult<Json<SettingsView>> {
	if !body.is_object() {
		return Err(Error::ValidationError("settings must be a JSON object".into()));
	}

	let config = app.settings.update(&body).await?;
	info!(subject = %auth.id_tag, active = config.enabled(), "Maintenance settings saved");

	Ok(Json(SettingsView {
		settings: config.to_value(),
		active: config.enabled(),
		preview_url: preview_url(),
	}))
}


// vim: ts=4
