//! Maintenance page rendering with Handlebars
//!
//! The page template is compiled once. Title, site name and logo URL are
//! escaped by the template; the message is inserted raw because it only ever
//! holds sanitizer output.

use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

use crate::prelude::*;
use crate::settings::Configuration;

const TEMPLATE_NAME: &str = "maintenance";

const DEFAULT_TEMPLATE: &str = include_str!("../templates/maintenance.html.hbs");

/// Served when the template itself fails to render
pub const FALLBACK_PAGE: &str = "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><meta name=\"robots\" content=\"noindex, nofollow\"><title>Maintenance</title></head>\n<body><h1>Down for maintenance</h1><p>Please try again later.</p></body>\n</html>\n";

/// Site-wide values shown on the page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteInfo {
	pub name: Box<str>,
	pub lang: Box<str>,
}

impl Default for SiteInfo {
	fn default() -> Self {
		Self { name: "My Site".into(), lang: "en".into() }
	}
}

#[derive(Serialize)]
struct PageVars<'a> {
	lang: &'a str,
	site_name: &'a str,
	logo_url: &'a str,
	title: &'a str,
	content: &'a str,
	bg_color: &'a str,
	text_color: &'a str,
}

pub struct TemplateEngine {
	handlebars: Handlebars<'static>,
}

impl std::fmt::Debug for TemplateEngine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TemplateEngine").finish_non_exhaustive()
	}
}

impl TemplateEngine {
	/// Engine with the built-in page template
	pub fn new() -> ClResult<Self> {
		Self::from_source(DEFAULT_TEMPLATE)
	}

	/// Engine with a custom page template
	pub fn from_source(source: &str) -> ClResult<Self> {
		let mut handlebars = Handlebars::new();

		// Catch templates referring to variables that do not exist
		handlebars.set_strict_mode(true);
		handlebars.register_template_string(TEMPLATE_NAME, source).map_err(|e| {
			Error::ConfigError(format!("Invalid maintenance page template: {}", e))
		})?;

		Ok(Self { handlebars })
	}

	pub fn from_file(path: &Path) -> ClResult<Self> {
		let source = std::fs::read_to_string(path).map_err(|e| {
			Error::ConfigError(format!("Cannot read template {}: {}", path.display(), e))
		})?;
		debug!("Loaded maintenance page template: {}", path.display());
		Self::from_source(&source)
	}

	pub fn render(&self, config: &Configuration, site: &SiteInfo) -> ClResult<String> {
		let vars = PageVars {
			lang: &site.lang,
			site_name: &site.name,
			logo_url: config.logo_url(),
			title: config.title(),
			content: config.content(),
			bg_color: config.background_color(),
			text_color: config.text_color(),
		};

		self.handlebars
			.render(TEMPLATE_NAME, &vars)
			.map_err(|e| Error::Internal(format!("Failed to render maintenance page: {}", e)))
	}

	/// Renders the page, degrading to [`FALLBACK_PAGE`] on failure
	pub fn render_or_fallback(&self, config: &Configuration, site: &SiteInfo) -> String {
		self.render(config, site).unwrap_or_else(|err| {
			warn!("{}, serving fallback page", err);
			FALLBACK_PAGE.to_string()
		})
	}
}


// vim: ts=4
