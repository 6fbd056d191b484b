//! Identity adapter reading operators and roles from a JSON file.
//!
//! Tokens are never stored in clear text. Each user carries the SHA-256 hash
//! of its bearer token, base64url encoded without padding (see [`hash_token`]).
//!
//! ```json
//! {
//!   "roles": [
//!     { "id": "administrator", "name": "Administrator", "capabilities": ["manage_settings"] },
//!     { "id": "editor", "name": "Editor" }
//!   ],
//!   "users": [
//!     { "id_tag": "alice", "token_hash": "…", "roles": ["administrator"] }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use hiatus::auth_adapter::{self, AuthCtx, RoleInfo};
use hiatus::prelude::*;

const ADMIN_ROLE: &str = "administrator";
const MANAGE_SETTINGS: &str = "manage_settings";

#[derive(Debug, Deserialize)]
struct RoleEntry {
	id: Box<str>,
	name: Option<Box<str>>,
	#[serde(default)]
	capabilities: Vec<Box<str>>,
}

#[derive(Debug, Deserialize)]
struct UserEntry {
	id_tag: Box<str>,
	token_hash: Box<str>,
	#[serde(default)]
	roles: Vec<Box<str>>,
}

#[derive(Debug, Default, Deserialize)]
struct UsersFile {
	#[serde(default)]
	roles: Vec<RoleEntry>,
	#[serde(default)]
	users: Vec<UserEntry>,
}

/// Hashes a bearer token the way it is stored in the users file
pub fn hash_token(token: &str) -> String {
	URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}

#[derive(Debug)]
pub struct AuthAdapterStatic {
	roles: Vec<RoleEntry>,
	/// Token hash to resolved identity
	users: HashMap<Box<str>, AuthCtx>,
}

impl AuthAdapterStatic {
	pub async fn new(path: &Path) -> ClResult<Self> {
		let data = tokio::fs::read(path).await.map_err(|e| {
			Error::ConfigError(format!("Cannot read users file {}: {}", path.display(), e))
		})?;
		let adapter = Self::from_json(&data)?;
		info!(
			"Loaded {} users and {} roles from {}",
			adapter.users.len(),
			adapter.roles.len(),
			path.display()
		);
		Ok(adapter)
	}

	pub fn from_json(data: &[u8]) -> ClResult<Self> {
		let file: UsersFile = serde_json::from_slice(data)
			.map_err(|e| Error::ConfigError(format!("Invalid users file: {}", e)))?;
		Ok(Self::from_users_file(file))
	}

	fn from_users_file(file: UsersFile) -> Self {
		let mut roles = file.roles;
		if let Some(admin) = roles.iter_mut().find(|role| role.id.as_ref() == ADMIN_ROLE) {
			if !admin.capabilities.iter().any(|c| c.as_ref() == MANAGE_SETTINGS) {
				admin.capabilities.push(MANAGE_SETTINGS.into());
			}
		} else {
			roles.insert(
				0,
				RoleEntry {
					id: ADMIN_ROLE.into(),
					name: Some("Administrator".into()),
					capabilities: vec![MANAGE_SETTINGS.into()],
				},
			);
		}

		let mut users = HashMap::with_capacity(file.users.len());
		for user in file.users {
			let mut capabilities: Vec<Box<str>> = Vec::new();
			for role_id in &user.roles {
				let Some(role) = roles.iter().find(|role| &role.id == role_id) else {
					warn!(subject = %user.id_tag, "Unknown role {} in users file", role_id);
					continue;
				};
				for cap in &role.capabilities {
					if !capabilities.contains(cap) {
						capabilities.push(cap.clone());
					}
				}
			}

			let ctx = AuthCtx {
				id_tag: user.id_tag,
				roles: user.roles.into_boxed_slice(),
				capabilities: capabilities.into_boxed_slice(),
			};
			if let Some(prev) = users.insert(user.token_hash, ctx) {
				warn!(subject = %prev.id_tag, "Duplicate token hash in users file, entry replaced");
			}
		}

		Self { roles, users }
	}
}

#[async_trait]
impl auth_adapter::AuthAdapter for AuthAdapterStatic {
	async fn validate_token(&self, token: &str) -> ClResult<AuthCtx> {
		self.users.get(hash_token(token).as_str()).cloned().ok_or(Error::Unauthorized)
	}

	async fn list_roles(&self) -> ClResult<Vec<RoleInfo>> {
		Ok(self
			.roles
			.iter()
			.map(|role| RoleInfo { id: role.id.clone(), name: role.name.clone() })
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hiatus::auth_adapter::AuthAdapter;

	fn users_json() -> String {
		format!(
			r#"{{
				"roles": [
					{{ "id": "administrator", "name": "Administrator" }},
					{{ "id": "editor", "name": "Editor", "capabilities": ["edit_posts"] }},
					{{ "id": "shop_manager" }}
				],
				"users": [
					{{ "id_tag": "alice", "token_hash": "{}", "roles": ["administrator", "editor"] }},
					{{ "id_tag": "bob", "token_hash": "{}", "roles": ["editor", "ghost"] }}
				]
			}}"#,
			hash_token("alice-secret"),
			hash_token("bob-secret"),
		)
	}

	#[test]
	fn test_hash_token() {
		// SHA-256 of the empty string
		assert_eq!(hash_token(""), "47DEQpj8HBSa-_TImW-5JCeuQeRkm5NMpJWZG3hSuFU");
		assert_ne!(hash_token("a"), hash_token("b"));
	}

	#[tokio::test]
	async fn test_validate_token() {
		let adapter = AuthAdapterStatic::from_json(users_json().as_bytes()).unwrap();

		let alice = adapter.validate_token("alice-secret").await.unwrap();
		assert_eq!(alice.id_tag.as_ref(), "alice");
		assert!(alice.has_role("administrator"));
		assert!(alice.has_capability(MANAGE_SETTINGS));
		assert!(alice.has_capability("edit_posts"));

		let bob = adapter.validate_token("bob-secret").await.unwrap();
		assert!(bob.has_role("editor"));
		assert!(!bob.has_capability(MANAGE_SETTINGS));

		assert!(matches!(adapter.validate_token("nope").await, Err(Error::Unauthorized)));
	}

	#[tokio::test]
	async fn test_list_roles() {
		let adapter = AuthAdapterStatic::from_json(users_json().as_bytes()).unwrap();
		let roles = adapter.list_roles().await.unwrap();
		let ids: Vec<&str> = roles.iter().map(|r| r.id.as_ref()).collect();
		assert_eq!(ids, vec!["administrator", "editor", "shop_manager"]);
		assert_eq!(roles[2].name, None);
	}

	#[tokio::test]
	async fn test_administrator_role_always_present() {
		let adapter = AuthAdapterStatic::from_json(br#"{ "users": [] }"#).unwrap();
		let roles = adapter.list_roles().await.unwrap();
		assert_eq!(roles.len(), 1);
		assert_eq!(roles[0].id.as_ref(), ADMIN_ROLE);
	}

	#[tokio::test]
	async fn test_load_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("users.json");
		std::fs::write(&path, users_json()).unwrap();
		let adapter = AuthAdapterStatic::new(&path).await.unwrap();
		assert!(adapter.validate_token("alice-secret").await.is_ok());

		let missing = AuthAdapterStatic::new(&dir.path().join("missing.json")).await;
		assert!(matches!(missing, Err(Error::ConfigError(_))));
	}

	#[test]
	fn test_invalid_file() {
		assert!(matches!(AuthAdapterStatic::from_json(b"[]"), Err(Error::ConfigError(_))));
	}
}

// vim: ts=4
