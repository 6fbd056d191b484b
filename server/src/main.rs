use std::{env, path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use hiatus::AppBuilder;
use hiatus::prelude::*;
use hiatus_auth_adapter_static::{AuthAdapterStatic, hash_token};
use hiatus_store_adapter_fs::StoreAdapterFs;

pub struct Config {
	pub data_dir: PathBuf,
	pub users_file: PathBuf,
}

/// Comma separated list from an environment variable
fn env_list(name: &str) -> Option<Vec<String>> {
	env::var(name).ok().map(|value| {
		value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
	})
}

async fn run() -> ClResult<()> {
	let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()));
	let config = Config {
		users_file: env::var("USERS_FILE")
			.map_or_else(|_| data_dir.join("users.json"), PathBuf::from),
		data_dir,
	};

	let mut builder = AppBuilder::new();

	if let Ok(listen) = env::var("LISTEN") {
		builder.listen(listen);
	}
	if let Ok(site_name) = env::var("SITE_NAME") {
		builder.site_name(site_name);
	}
	if let Ok(lang) = env::var("SITE_LANG") {
		builder.lang(lang);
	}
	if let Ok(dist_dir) = env::var("DIST_DIR") {
		builder.dist_dir(PathBuf::from(dist_dir));
	}
	if let Ok(template) = env::var("TEMPLATE_FILE") {
		builder.template_path(PathBuf::from(template));
	}
	if let Ok(ttl) = env::var("SETTINGS_CACHE_TTL") {
		let secs: u64 = ttl.parse().map_err(|_| {
			Error::ConfigError(format!("SETTINGS_CACHE_TTL must be a number of seconds: {}", ttl))
		})?;
		builder.settings_cache_ttl(Duration::from_secs(secs));
	}
	if let Some(paths) = env_list("CRON_PATHS") {
		builder.cron_paths(paths);
	}
	if let Some(prefixes) = env_list("REST_PREFIXES") {
		builder.rest_prefixes(prefixes);
	}
	if let Some(paths) = env_list("RPC_PATHS") {
		builder.rpc_paths(paths);
	}

	let auth_adapter = Arc::new(AuthAdapterStatic::new(&config.users_file).await?);
	let store_adapter =
		Arc::new(StoreAdapterFs::new(config.data_dir.join("settings").into()).await?);
	builder.auth_adapter(auth_adapter).store_adapter(store_adapter);

	builder.run().await
}

#[tokio::main]
async fn main() -> ExitCode {
	// `hiatus-server hash-token <token>` prints the users file entry for a token
	let args: Vec<String> = env::args().collect();
	if let [_, cmd, token] = args.as_slice()
		&& cmd == "hash-token"
	{
		println!("{}", hash_token(token));
		return ExitCode::SUCCESS;
	}

	match run().await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			error!("FATAL: {}", err);
			ExitCode::FAILURE
		}
	}
}

// vim: ts=4
