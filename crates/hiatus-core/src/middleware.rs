//! Request middlewares: identity, classification and the maintenance gate
//!
//! Layer order matters. [`optional_auth`] and [`classify_request`] have to
//! run before [`maintenance_gate`] so the gate sees the request identity and
//! its system flags.

use axum::{
	extract::{Request, State},
	http::{HeaderMap, header},
	middleware::Next,
	response::{IntoResponse, Response},
};

use crate::extract::{Auth, OptionalAuth};
use crate::intercept::{Outcome, RequestCtx, evaluate};
use crate::prelude::*;
use crate::system::SystemCtx;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
	let token = value.strip_prefix("Bearer ")?.trim();
	(!token.is_empty()).then_some(token)
}

/// Resolves the bearer token into an [`Auth`] extension.
///
/// A missing or rejected token leaves the request unauthenticated.
pub async fn optional_auth(State(app): State<App>, mut req: Request, next: Next) -> Response {
	let auth = match bearer_token(req.headers()) {
		Some(token) => match app.auth_adapter.validate_token(token).await {
			Ok(auth) => Some(auth),
			Err(err) => {
				debug!("Bearer token rejected, continuing unauthenticated: {}", err);
				None
			}
		},
		None => None,
	};

	if let Some(auth) = auth {
		req.extensions_mut().insert(Auth(auth));
	}

	next.run(req).await
}

/// Inserts the [`SystemCtx`] of the request unless an outer layer already did
pub async fn classify_request(State(app): State<App>, mut req: Request, next: Next) -> Response {
	if req.extensions().get::<SystemCtx>().is_none() {
		let ctx = app.opts.system_routes.classify(req.uri().path());
		req.extensions_mut().insert(ctx);
	}

	next.run(req).await
}

/// Serves the maintenance page instead of the application when required
pub async fn maintenance_gate(
	State(app): State<App>,
	OptionalAuth(auth): OptionalAuth,
	system: SystemCtx,
	req: Request,
	next: Next,
) -> Response {
	let config = app.settings.load().await;
	let ctx = RequestCtx { query: req.uri().query(), auth: auth.as_ref(), system };

	match evaluate(&config, &ctx, &app.templates, &app.opts.site) {
		Outcome::Pass => next.run(req).await,
		Outcome::Block(page) | Outcome::Render(page) => page.into_response(),
	}
}


// vim: ts=4
