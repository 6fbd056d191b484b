//! Adapter that resolves request identities and enumerates roles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::prelude::*;

/// Context struct for an authenticated user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthCtx {
	pub id_tag: Box<str>,
	pub roles: Box<[Box<str>]>,
	pub capabilities: Box<[Box<str>]>,
}

impl AuthCtx {
	pub fn has_role(&self, role: &str) -> bool {
		self.roles.iter().any(|r| r.as_ref() == role)
	}

	pub fn has_capability(&self, capability: &str) -> bool {
		self.capabilities.iter().any(|c| c.as_ref() == capability)
	}
}

/// A role known to the identity system
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
	pub id: Box<str>,
	pub name: Option<Box<str>>,
}

#[async_trait]
pub trait AuthAdapter: Debug + Send + Sync {
	/// Resolves a bearer token to an identity.
	///
	/// Returns `Error::Unauthorized` for unknown tokens.
	async fn validate_token(&self, token: &str) -> ClResult<AuthCtx>;

	/// Lists every role the identity system knows about
	async fn list_roles(&self) -> ClResult<Vec<RoleInfo>>;
}


// vim: ts=4
