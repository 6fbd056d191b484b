//! Role listing for the bypass selector

use axum::{Json, extract::State};
use serde::Serialize;
use serde_with::skip_serializing_none;

use hiatus_core::settings::ADMIN_ROLE;

use crate::prelude::*;

#[skip_serializing_none]
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RoleView {
	pub id: Box<str>,
	pub name: Option<Box<str>>,
	/// Currently exempt from the gate
	pub bypass: bool,
	/// Cannot be removed from the bypass set
	pub locked: bool,
}

/// GET /api/maintenance/roles
///
/// Lists the roles known to the identity system. Bypass roles that the
/// identity system no longer knows are appended so they stay visible.
pub async fn list_roles(State(app): State<App>) -> ClResult<Json<Vec<RoleView>>> {
	let config = app.settings.load().await;
	let known = app.auth_adapter.list_roles().await?;

	let mut roles: Vec<RoleView> = known
		.into_iter()
		.map(|role| RoleView {
			bypass: config.bypass_roles().contains(&role.id),
			locked: role.id.as_ref() == ADMIN_ROLE,
			id: role.id,
			name: role.name,
		})
		.collect();

	for id in config.bypass_roles() {
		if !roles.iter().any(|role| &role.id == id) {
			roles.push(RoleView {
				id: id.clone(),
				name: None,
				bypass: true,
				locked: id.as_ref() == ADMIN_ROLE,
			});
		}
	}

	Ok(Json(roles))
}

// vim: ts=4
