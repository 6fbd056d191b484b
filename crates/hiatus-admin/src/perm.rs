//! Operator permission middleware

use axum::{
	extract::{Request, State},
	middleware::Next,
	response::Response,
};

use hiatus_core::extract::Auth;
use hiatus_core::preview::MANAGE_SETTINGS;

use crate::prelude::*;

/// Requires an identity holding the settings capability.
///
/// Missing identity is rejected by the [`Auth`] extractor with 401.
pub async fn require_manage_settings(
	State(_app): State<App>,
	Auth(auth_ctx): Auth,
	req: Request,
	next: Next,
) -> Result<Response, Error> {
	if !auth_ctx.has_capability(MANAGE_SETTINGS) {
		warn!(
			subject = %auth_ctx.id_tag,
			roles = ?auth_ctx.roles,
			"Maintenance settings access denied, {} required",
			MANAGE_SETTINGS
		);
		return Err(Error::PermissionDenied);
	}

	Ok(next.run(req).await)
}

// vim: ts=4
