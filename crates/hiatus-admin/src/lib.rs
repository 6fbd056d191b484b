//! Operator API for the maintenance settings

pub mod perm;
pub mod roles;
pub mod settings;

mod prelude;

use axum::{
	Router, middleware,
	routing::get,
};

use hiatus_core::App;

/// Routes under `/api/maintenance`, all guarded by [`perm::require_manage_settings`]
pub fn router(app: App) -> Router<App> {
	Router::new()
		.route("/api/maintenance/settings", get(settings::get_settings).put(settings::put_settings))
		.route("/api/maintenance/roles", get(roles::list_roles))
		.route_layer(middleware::from_fn_with_state(app, perm::require_manage_settings))
}

// vim: ts=4
