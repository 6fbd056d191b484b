//! App builder - constructs and runs the Hiatus application

use axum::Router;
use std::{path::Path, sync::Arc, time::Duration};

use crate::auth_adapter::AuthAdapter;
use crate::prelude::*;
use crate::store_adapter::StoreAdapter;
use crate::{routes, webserver};
pub use hiatus_core::app::{App, AppBuilderOpts, AppState, VERSION};
use hiatus_core::render::TemplateEngine;
use hiatus_core::settings::SettingsService;
use hiatus_core::system::SystemRoutes;

#[derive(Default)]
pub struct Adapters {
	pub auth_adapter: Option<Arc<dyn AuthAdapter>>,
	pub store_adapter: Option<Arc<dyn StoreAdapter>>,
}

pub struct AppBuilder {
	opts: AppBuilderOpts,
	adapters: Adapters,
}

impl AppBuilder {
	pub fn new() -> Self {
		// A subscriber may already be installed by the embedding application
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder { opts: AppBuilderOpts::default(), adapters: Adapters::default() }
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn site_name(&mut self, site_name: impl Into<Box<str>>) -> &mut Self {
		self.opts.site.name = site_name.into();
		self
	}
	pub fn lang(&mut self, lang: impl Into<Box<str>>) -> &mut Self {
		self.opts.site.lang = lang.into();
		self
	}
	pub fn dist_dir(&mut self, dist_dir: impl Into<Box<Path>>) -> &mut Self {
		self.opts.dist_dir = Some(dist_dir.into());
		self
	}
	pub fn template_path(&mut self, template_path: impl Into<Box<Path>>) -> &mut Self {
		self.opts.template_path = Some(template_path.into());
		self
	}
	pub fn settings_cache_ttl(&mut self, ttl: Duration) -> &mut Self {
		self.opts.settings_cache_ttl = ttl;
		self
	}
	pub fn system_routes(&mut self, system_routes: SystemRoutes) -> &mut Self {
		self.opts.system_routes = system_routes;
		self
	}
	pub fn cron_paths(&mut self, paths: impl IntoIterator<Item = impl Into<Box<str>>>) -> &mut Self {
		self.opts.system_routes.cron_paths = paths.into_iter().map(Into::into).collect();
		self
	}
	pub fn rest_prefixes(
		&mut self,
		prefixes: impl IntoIterator<Item = impl Into<Box<str>>>,
	) -> &mut Self {
		self.opts.system_routes.rest_prefixes = prefixes.into_iter().map(Into::into).collect();
		self
	}
	pub fn rpc_paths(&mut self, paths: impl IntoIterator<Item = impl Into<Box<str>>>) -> &mut Self {
		self.opts.system_routes.rpc_paths = paths.into_iter().map(Into::into).collect();
		self
	}

	// Adapters
	pub fn auth_adapter(&mut self, auth_adapter: Arc<dyn AuthAdapter>) -> &mut Self {
		self.adapters.auth_adapter = Some(auth_adapter);
		self
	}
	pub fn store_adapter(&mut self, store_adapter: Arc<dyn StoreAdapter>) -> &mut Self {
		self.adapters.store_adapter = Some(store_adapter);
		self
	}

	/// Creates the app state and its router without binding a listener
	pub fn build(self) -> ClResult<(App, Router)> {
		let Some(auth_adapter) = self.adapters.auth_adapter else {
			error!("FATAL: No auth adapter configured");
			return Err(Error::ConfigError("No auth adapter configured".to_string()));
		};
		let Some(store_adapter) = self.adapters.store_adapter else {
			error!("FATAL: No store adapter configured");
			return Err(Error::ConfigError("No store adapter configured".to_string()));
		};

		let templates = match &self.opts.template_path {
			Some(path) => TemplateEngine::from_file(path)?,
			None => TemplateEngine::new()?,
		};

		let settings =
			Arc::new(SettingsService::new(store_adapter, self.opts.settings_cache_ttl));
		info!(
			"Settings subsystem initialized (snapshot ttl: {}ms)",
			self.opts.settings_cache_ttl.as_millis()
		);

		let app: App = Arc::new(AppState {
			opts: self.opts,
			auth_adapter,
			settings,
			templates: Arc::new(templates),
		});
		let router = routes::init(app.clone());

		Ok((app, router))
	}

	pub async fn run(self) -> ClResult<()> {
		info!(" _     _       _");
		info!("| |__ (_) __ _| |_ _   _ ___");
		info!("| '_ \\| |/ _` | __| | | / __|");
		info!("| | | | | (_| | |_| |_| \\__ \\");
		info!("|_| |_|_|\\__,_|\\__|\\__,_|___/");
		info!("V{}", VERSION);
		info!("");

		let (app, router) = self.build()?;

		let config = app.settings.load().await;
		if config.enabled() {
			warn!("Maintenance mode is active, visitors get the maintenance page");
		}

		webserver::serve(&app.opts.listen, router).await
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
