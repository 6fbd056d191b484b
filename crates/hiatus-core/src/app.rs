//! App state type

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use hiatus_types::auth_adapter::AuthAdapter;

use crate::render::{SiteInfo, TemplateEngine};
use crate::settings::SettingsService;
use crate::system::SystemRoutes;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub opts: AppBuilderOpts,

	pub auth_adapter: Arc<dyn AuthAdapter>,

	// Settings subsystem
	pub settings: Arc<SettingsService>,

	pub templates: Arc<TemplateEngine>,
}

pub type App = Arc<AppState>;

#[derive(Clone, Debug)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	pub site: SiteInfo,
	/// Static application served behind the gate
	pub dist_dir: Option<Box<Path>>,
	pub system_routes: SystemRoutes,
	/// Lifetime of a settings snapshot, zero disables caching
	pub settings_cache_ttl: Duration,
	/// Custom maintenance page template
	pub template_path: Option<Box<Path>>,
}

impl Default for AppBuilderOpts {
	fn default() -> Self {
		Self {
			listen: "127.0.0.1:8080".into(),
			site: SiteInfo::default(),
			dist_dir: None,
			system_routes: SystemRoutes::default(),
			settings_cache_ttl: Duration::from_secs(5),
			template_path: None,
		}
	}
}

// vim: ts=4
