#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
	Router,
	body::Body,
	http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use hiatus::auth_adapter::{AuthAdapter, AuthCtx, RoleInfo};
use hiatus::error::{ClResult, Error};
use hiatus::settings::SETTINGS_KEY;
use hiatus::store_adapter::StoreAdapter;
use hiatus::{App, AppBuilder};

#[derive(Debug, Default)]
pub struct MemoryStore {
	pub records: Mutex<HashMap<String, Value>>,
	pub fail: Mutex<bool>,
}

impl MemoryStore {
	pub fn with_record(record: Value) -> Arc<Self> {
		let store = Self::default();
		store.records.lock().insert(SETTINGS_KEY.to_string(), record);
		Arc::new(store)
	}

	pub fn record(&self) -> Option<Value> {
		self.records.lock().get(SETTINGS_KEY).cloned()
	}
}

#[async_trait]
impl StoreAdapter for MemoryStore {
	async fn read_setting(&self, key: &str) -> ClResult<Option<Value>> {
		if *self.fail.lock() {
			return Err(Error::ServiceUnavailable("store offline".into()));
		}
		Ok(self.records.lock().get(key).cloned())
	}

	async fn update_setting(&self, key: &str, value: Value) -> ClResult<()> {
		if *self.fail.lock() {
			return Err(Error::ServiceUnavailable("store offline".into()));
		}
		self.records.lock().insert(key.to_string(), value);
		Ok(())
	}
}

/// Tokens: `admin`, `editor`, `subscriber`
#[derive(Debug)]
pub struct TokenAuth;

#[async_trait]
impl AuthAdapter for TokenAuth {
	async fn validate_token(&self, token: &str) -> ClResult<AuthCtx> {
		let (role, capabilities) = match token {
			"admin" => ("administrator", vec!["manage_settings", "edit_posts"]),
			"editor" => ("editor", vec!["edit_posts"]),
			"subscriber" => ("subscriber", Vec::new()),
			_ => return Err(Error::Unauthorized),
		};
		Ok(AuthCtx {
			id_tag: token.into(),
			roles: vec![role.into()].into_boxed_slice(),
			capabilities: capabilities.into_iter().map(Box::from).collect(),
		})
	}

	async fn list_roles(&self) -> ClResult<Vec<RoleInfo>> {
		Ok(["administrator", "editor", "subscriber"]
			.into_iter()
			.map(|id| RoleInfo { id: id.into(), name: None })
			.collect())
	}
}

pub const APP_PAGE: &str = "<h1>Application</h1>";

pub struct TestApp {
	pub app: App,
	pub router: Router,
	pub store: Arc<MemoryStore>,
	_dist: TempDir,
}

/// App serving a one page static site from a temporary directory
pub fn build(store: Arc<MemoryStore>) -> TestApp {
	let dist = tempfile::tempdir().unwrap();
	std::fs::write(dist.path().join("index.html"), APP_PAGE).unwrap();

	let mut builder = AppBuilder::new();
	builder
		.settings_cache_ttl(Duration::ZERO)
		.site_name("Test Site")
		.dist_dir(dist.path())
		.auth_adapter(Arc::new(TokenAuth))
		.store_adapter(store.clone());
	let (app, router) = builder.build().unwrap();

	TestApp { app, router, store, _dist: dist }
}

pub struct TestResponse {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: String,
}

impl TestResponse {
	pub fn json(&self) -> Value {
		serde_json::from_str(&self.body).unwrap()
	}
}

pub async fn send(
	router: &Router,
	method: Method,
	uri: &str,
	token: Option<&str>,
	body: Option<Value>,
) -> TestResponse {
	let mut req = Request::builder().method(method).uri(uri);
	if let Some(token) = token {
		req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
	}
	let req = match body {
		Some(body) => req
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(body.to_string()))
			.unwrap(),
		None => req.body(Body::empty()).unwrap(),
	};

	let response = router.clone().oneshot(req).await.unwrap();
	let status = response.status();
	let headers = response.headers().clone();
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	TestResponse { status, headers, body: String::from_utf8(bytes.to_vec()).unwrap() }
}

pub async fn get(router: &Router, uri: &str, token: Option<&str>) -> TestResponse {
	send(router, Method::GET, uri, token, None).await
}

// vim: ts=4
