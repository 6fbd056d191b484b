//! Router assembly
//!
//! Layers run outermost first: tracing, identity, classification, gate.

use axum::{Router, middleware};
use tower_http::{services::ServeDir, trace::TraceLayer};

use hiatus_core::middleware::{classify_request, maintenance_gate, optional_auth};

use crate::prelude::*;

pub fn init(app: App) -> Router {
	let mut router = Router::new().merge(hiatus_admin::router(app.clone()));

	if let Some(dist_dir) = &app.opts.dist_dir {
		debug!("Serving static files from {}", dist_dir.display());
		router = router.fallback_service(ServeDir::new(dist_dir));
	}

	router
		.layer(middleware::from_fn_with_state(app.clone(), maintenance_gate))
		.layer(middleware::from_fn_with_state(app.clone(), classify_request))
		.layer(middleware::from_fn_with_state(app.clone(), optional_auth))
		.layer(TraceLayer::new_for_http())
		.with_state(app)
}

// vim: ts=4
