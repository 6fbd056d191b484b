//! Per-request evaluation of preview and gate
//!
//! The preview check runs first so operators can inspect the page while the
//! gate would pass them (or while it is disabled). The result is a tagged
//! [`Outcome`]; the caller turns it into a response and stops routing.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use hiatus_types::auth_adapter::AuthCtx;

use crate::gate::{self, GateDecision, RETRY_AFTER_SECS};
use crate::prelude::*;
use crate::preview::{self, PreviewDecision};
use crate::render::{SiteInfo, TemplateEngine};
use crate::settings::Configuration;
use crate::system::SystemCtx;

/// Request attributes the core decides on
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestCtx<'a> {
	pub query: Option<&'a str>,
	pub auth: Option<&'a AuthCtx>,
	pub system: SystemCtx,
}

/// A rendered maintenance page ready to be sent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaintenancePage {
	pub status: StatusCode,
	pub retry_after: Option<u32>,
	pub body: String,
}

impl MaintenancePage {
	/// Page sent to a blocked visitor
	pub fn blocked(body: String) -> Self {
		Self { status: StatusCode::SERVICE_UNAVAILABLE, retry_after: Some(RETRY_AFTER_SECS), body }
	}

	/// Page sent to an operator asking for a preview
	pub fn preview(body: String) -> Self {
		Self { status: StatusCode::OK, retry_after: None, body }
	}
}

impl IntoResponse for MaintenancePage {
	fn into_response(self) -> Response {
		let mut response = (self.status, self.body).into_response();
		let headers = response.headers_mut();
		headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
		if let Some(secs) = self.retry_after {
			headers.insert(header::RETRY_AFTER, HeaderValue::from(secs));
		}
		response
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
	/// Continue with normal routing
	Pass,
	/// Gate blocked the request
	Block(MaintenancePage),
	/// Operator preview
	Render(MaintenancePage),
}

pub fn evaluate(
	config: &Configuration,
	req: &RequestCtx<'_>,
	templates: &TemplateEngine,
	site: &SiteInfo,
) -> Outcome {
	if preview::check(req.query, req.auth) == PreviewDecision::Render {
		debug!(
			subject = req.auth.map(|auth| auth.id_tag.as_ref()),
			"Rendering maintenance preview"
		);
		return Outcome::Render(MaintenancePage::preview(
			templates.render_or_fallback(config, site),
		));
	}

	match gate::decide(config, req.auth, req.system) {
		GateDecision::Pass => Outcome::Pass,
		GateDecision::Block => {
			debug!(
				authenticated = req.auth.is_some(),
				"Maintenance mode active, blocking request"
			);
			Outcome::Block(MaintenancePage::blocked(templates.render_or_fallback(config, site)))
		}
	}
}


// vim: ts=4
