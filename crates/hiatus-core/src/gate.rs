//! Interception gate
//!
//! Decides for every inbound request whether the maintenance page replaces
//! the application. Rules are evaluated in order, the first match wins:
//!
//! 1. gate disabled: pass
//! 2. authenticated with a bypass role: pass
//! 3. scheduled task, API or RPC request: pass
//! 4. otherwise: block

use hiatus_types::auth_adapter::AuthCtx;

use crate::settings::Configuration;
use crate::system::SystemCtx;

/// `Retry-After` value sent with a blocked request
pub const RETRY_AFTER_SECS: u32 = 3600;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
	Pass,
	Block,
}

/// Runs the gate policy. `auth` is `None` for unauthenticated requests.
pub fn decide(config: &Configuration, auth: Option<&AuthCtx>, system: SystemCtx) -> GateDecision {
	if !config.enabled() {
		return GateDecision::Pass;
	}

	if auth.is_some_and(|auth| config.bypasses(auth)) {
		return GateDecision::Pass;
	}

	if system.is_system() {
		return GateDecision::Pass;
	}

	GateDecision::Block
}

#[cfg(test)]
mod tests {
	use super::*;

	fn user(roles: &[&str]) -> AuthCtx {
		AuthCtx {
			id_tag: "user".into(),
			roles: roles.iter().map(|r| Box::from(*r)).collect(),
			capabilities: Box::default(),
		}
	}

	fn system_variants() -> [SystemCtx; 3] {
		[
			SystemCtx { cron: true, ..SystemCtx::default() },
			SystemCtx { rest: true, ..SystemCtx::default() },
			SystemCtx { rpc: true, ..SystemCtx::default() },
		]
	}

	#[test]
	fn test_disabled_always_passes() {
		let config = Configuration::default();
		let admin = user(&["administrator"]);
		let editor = user(&["editor"]);
		for auth in [None, Some(&admin), Some(&editor)] {
			assert_eq!(decide(&config, auth, SystemCtx::default()), GateDecision::Pass);
			for system in system_variants() {
				assert_eq!(decide(&config, auth, system), GateDecision::Pass);
			}
		}
	}

	#[test]
	fn test_bypass_role_passes() {
		let config = Configuration::default().with_enabled(true);
		let admin = user(&["subscriber", "administrator"]);
		assert_eq!(decide(&config, Some(&admin), SystemCtx::default()), GateDecision::Pass);
	}

	#[test]
	fn test_editor_blocked_without_bypass() {
		let config = Configuration::default().with_enabled(true);
		let editor = user(&["editor"]);
		assert_eq!(decide(&config, Some(&editor), SystemCtx::default()), GateDecision::Block);
	}

	#[test]
	fn test_editor_passes_with_bypass() {
		let config = Configuration::default().with_enabled(true).with_bypass_roles(["editor"]);
		let editor = user(&["editor"]);
		assert_eq!(decide(&config, Some(&editor), SystemCtx::default()), GateDecision::Pass);
	}

	#[test]
	fn test_system_requests_pass_unauthenticated() {
		let config = Configuration::default().with_enabled(true);
		for system in system_variants() {
			assert_eq!(decide(&config, None, system), GateDecision::Pass);
		}
	}

	#[test]
	fn test_anonymous_visitor_blocked() {
		let config = Configuration::default().with_enabled(true);
		assert_eq!(decide(&config, None, SystemCtx::default()), GateDecision::Block);
	}

	#[test]
	fn test_authenticated_without_roles_blocked() {
		let config = Configuration::default().with_enabled(true);
		let nobody = user(&[]);
		assert_eq!(decide(&config, Some(&nobody), SystemCtx::default()), GateDecision::Block);
	}
}

// vim: ts=4
