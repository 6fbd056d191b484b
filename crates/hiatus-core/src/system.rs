//! System request classification
//!
//! Scheduled tasks, programmatic API calls and legacy RPC clients are not
//! visitors and must keep working during maintenance. Requests are
//! classified by path; an embedding application may instead insert its own
//! [`SystemCtx`] into the request extensions before the classifier runs.

/// System flags of a single request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemCtx {
	/// Scheduled task runner
	pub cron: bool,
	/// Programmatic API request
	pub rest: bool,
	/// Legacy remote procedure call
	pub rpc: bool,
}

impl SystemCtx {
	pub fn is_system(&self) -> bool {
		self.cron || self.rest || self.rpc
	}
}

/// Path rules used to classify system requests
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemRoutes {
	/// Exact paths of the scheduled task runner
	pub cron_paths: Box<[Box<str>]>,
	/// Path prefixes of the programmatic API. A prefix ending in `/` also
	/// matches the bare path without that slash.
	pub rest_prefixes: Box<[Box<str>]>,
	/// Exact paths of the legacy RPC endpoint
	pub rpc_paths: Box<[Box<str>]>,
}

impl Default for SystemRoutes {
	fn default() -> Self {
		Self {
			cron_paths: vec!["/cron".into()].into_boxed_slice(),
			rest_prefixes: vec!["/api/".into()].into_boxed_slice(),
			rpc_paths: vec!["/xmlrpc".into()].into_boxed_slice(),
		}
	}
}

impl SystemRoutes {
	pub fn classify(&self, path: &str) -> SystemCtx {
		SystemCtx {
			cron: self.cron_paths.iter().any(|p| p.as_ref() == path),
			rest: self.rest_prefixes.iter().any(|p| matches_prefix(p, path)),
			rpc: self.rpc_paths.iter().any(|p| p.as_ref() == path),
		}
	}
}

fn matches_prefix(prefix: &str, path: &str) -> bool {
	if path.starts_with(prefix) {
		return true;
	}
	match prefix.strip_suffix('/') {
		Some(bare) if !bare.is_empty() => path == bare,
		_ => false,
	}
}


// vim: ts=4
