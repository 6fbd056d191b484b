//! Settings service with snapshot caching and fail-open loading

use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use hiatus_types::store_adapter::StoreAdapter;

use super::sanitize::sanitize;
use super::types::{Configuration, SETTINGS_KEY};
use crate::prelude::*;

struct CachedSnapshot {
	loaded_at: Instant,
	config: Arc<Configuration>,
}

/// Loads and replaces the maintenance configuration record
pub struct SettingsService {
	store: Arc<dyn StoreAdapter>,
	cache: RwLock<Option<CachedSnapshot>>,
	/// Bumped on every invalidation; a load only caches what it read if no
	/// invalidation happened meanwhile
	generation: AtomicU64,
	ttl: Duration,
}

impl SettingsService {
	/// A zero `ttl` disables snapshot caching
	pub fn new(store: Arc<dyn StoreAdapter>, ttl: Duration) -> Self {
		Self { store, cache: RwLock::new(None), generation: AtomicU64::new(0), ttl }
	}

	fn cached(&self) -> Option<Arc<Configuration>> {
		let cache = self.cache.read();
		cache
			.as_ref()
			.filter(|snapshot| snapshot.loaded_at.elapsed() < self.ttl)
			.map(|snapshot| snapshot.config.clone())
	}

	/// Returns the current configuration snapshot.
	///
	/// Never fails: an unreadable or malformed record is replaced by the
	/// defaults, which keep the gate disabled.
	pub async fn load(&self) -> Arc<Configuration> {
		if let Some(config) = self.cached() {
			return config;
		}

		let generation = self.generation.load(Ordering::Acquire);
		let (config, healthy) = match self.store.read_setting(SETTINGS_KEY).await {
			Ok(Some(value)) if value.is_object() => (sanitize(&value), true),
			Ok(Some(value)) => {
				warn!(
					"Malformed maintenance settings record ({}), using defaults",
					json_kind(&value)
				);
				(Configuration::default(), true)
			}
			Ok(None) => (Configuration::default(), true),
			Err(err) => {
				warn!("Maintenance settings unavailable, gate disabled: {}", err);
				(Configuration::default(), false)
			}
		};
		let config = Arc::new(config);

		// Store failures are retried on the next request
		if healthy && !self.ttl.is_zero() {
			let mut cache = self.cache.write();
			if self.generation.load(Ordering::Acquire) == generation {
				*cache = Some(CachedSnapshot { loaded_at: Instant::now(), config: config.clone() });
			} else {
				debug!("Settings changed during load, snapshot not cached");
			}
		}

		config
	}

	/// Sanitizes a settings submission and replaces the stored record
	pub async fn update(&self, raw: &serde_json::Value) -> ClResult<Arc<Configuration>> {
		let config = sanitize(raw);
		self.store.update_setting(SETTINGS_KEY, config.to_value()).await?;
		self.invalidate();

		info!(
			enabled = config.enabled(),
			bypass_roles = ?config.bypass_roles(),
			"Maintenance settings updated"
		);
		Ok(Arc::new(config))
	}

	/// Drops the cached snapshot
	pub fn invalidate(&self) {
		let mut cache = self.cache.write();
		self.generation.fetch_add(1, Ordering::AcqRel);
		*cache = None;
	}
}

fn json_kind(value: &serde_json::Value) -> &'static str {
	match value {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "bool",
		serde_json::Value::Number(_) => "number",
		serde_json::Value::String(_) => "string",
		serde_json::Value::Array(_) => "array",
		serde_json::Value::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use serde_json::json;
	use std::collections::HashMap;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[derive(Debug, Default)]
	struct TestStore {
		records: parking_lot::Mutex<HashMap<String, serde_json::Value>>,
		fail: std::sync::atomic::AtomicBool,
		reads: AtomicUsize,
	}

	#[async_trait]
	impl StoreAdapter for TestStore {
		async fn read_setting(&self, key: &str) -> ClResult<Option<serde_json::Value>> {
			self.reads.fetch_add(1, Ordering::SeqCst);
			if self.fail.load(Ordering::SeqCst) {
				return Err(Error::ServiceUnavailable("store down".into()));
			}
			Ok(self.records.lock().get(key).cloned())
		}

		async fn update_setting(&self, key: &str, value: serde_json::Value) -> ClResult<()> {
			if self.fail.load(Ordering::SeqCst) {
				return Err(Error::ServiceUnavailable("store down".into()));
			}
			self.records.lock().insert(key.to_string(), value);
			Ok(())
		}
	}

	fn service(store: &Arc<TestStore>, ttl: Duration) -> SettingsService {
		SettingsService::new(store.clone(), ttl)
	}

	#[tokio::test]
	async fn test_absent_record_uses_defaults() {
		let store = Arc::new(TestStore::default());
		let config = service(&store, Duration::ZERO).load().await;
		assert_eq!(*config, Configuration::default());
	}

	#[tokio::test]
	async fn test_store_failure_fails_open() {
		let store = Arc::new(TestStore::default());
		store.records.lock().insert(SETTINGS_KEY.into(), json!({ "enabled": true }));
		store.fail.store(true, Ordering::SeqCst);

		let config = service(&store, Duration::from_secs(60)).load().await;
		assert!(!config.enabled());
		assert_eq!(*config, Configuration::default());
	}

	#[tokio::test]
	async fn test_malformed_record_fails_open() {
		let store = Arc::new(TestStore::default());
		store.records.lock().insert(SETTINGS_KEY.into(), json!(["enabled"]));
		let config = service(&store, Duration::ZERO).load().await;
		assert!(!config.enabled());
	}

	#[tokio::test]
	async fn test_stored_record_is_sanitized_on_load() {
		let store = Arc::new(TestStore::default());
		store.records.lock().insert(
			SETTINGS_KEY.into(),
			json!({
				"enabled": 1,
				"content": "<p>x</p><script>steal()</script>",
				"bg_color": "red",
				"bypass_roles": ["editor"]
			}),
		);

		let config = service(&store, Duration::ZERO).load().await;
		assert!(config.enabled());
		assert_eq!(config.content(), "<p>x</p>");
		assert_eq!(config.background_color(), "#ffffff");
		assert!(config.bypass_roles().contains("administrator"));
		assert!(config.bypass_roles().contains("editor"));
	}

	#[tokio::test]
	async fn test_update_persists_sanitized_record() {
		let store = Arc::new(TestStore::default());
		let svc = service(&store, Duration::from_secs(60));

		let config = svc.update(&json!({ "enabled": "1", "bypass_roles": [] })).await.unwrap();
		assert!(config.enabled());

		let stored = store.records.lock().get(SETTINGS_KEY).cloned().unwrap();
		assert_eq!(stored["bypass_roles"], json!(["administrator"]));
		assert_eq!(stored["enabled"], json!(true));
	}

	#[tokio::test]
	async fn test_cache_and_invalidation() {
		let store = Arc::new(TestStore::default());
		let svc = service(&store, Duration::from_secs(60));

		assert!(!svc.load().await.enabled());
		assert!(!svc.load().await.enabled());
		assert_eq!(store.reads.load(Ordering::SeqCst), 1);

		svc.update(&json!({ "enabled": true })).await.unwrap();
		assert!(svc.load().await.enabled());
		assert_eq!(store.reads.load(Ordering::SeqCst), 2);
	}

	/// Store whose first read holds on to the record it read until resumed
	#[derive(Debug, Default)]
	struct PausingStore {
		inner: TestStore,
		paused: std::sync::atomic::AtomicBool,
		read_taken: tokio::sync::Notify,
		resume: tokio::sync::Notify,
	}

	#[async_trait]
	impl StoreAdapter for PausingStore {
		async fn read_setting(&self, key: &str) -> ClResult<Option<serde_json::Value>> {
			let value = self.inner.read_setting(key).await;
			if !self.paused.swap(true, Ordering::SeqCst) {
				self.read_taken.notify_one();
				self.resume.notified().await;
			}
			value
		}

		async fn update_setting(&self, key: &str, value: serde_json::Value) -> ClResult<()> {
			self.inner.update_setting(key, value).await
		}
	}

	#[tokio::test]
	async fn test_update_during_load_is_not_lost() {
		let store = Arc::new(PausingStore::default());
		let svc = Arc::new(SettingsService::new(store.clone(), Duration::from_secs(60)));

		let pending = tokio::spawn({
			let svc = svc.clone();
			async move { svc.load().await }
		});
		store.read_taken.notified().await;

		svc.update(&json!({ "enabled": true })).await.unwrap();
		store.resume.notify_one();

		// The in-flight load returns what it read but must not cache it
		assert!(!pending.await.unwrap().enabled());
		assert!(svc.load().await.enabled());
	}

	#[tokio::test]
	async fn test_zero_ttl_reads_every_time() {
		let store = Arc::new(TestStore::default());
		let svc = service(&store, Duration::ZERO);
		svc.load().await;
		svc.load().await;
		assert_eq!(store.reads.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn test_update_failure_propagates() {
		let store = Arc::new(TestStore::default());
		store.fail.store(true, Ordering::SeqCst);
		let result = service(&store, Duration::ZERO).update(&json!({ "enabled": true })).await;
		assert!(matches!(result, Err(Error::ServiceUnavailable(_))));
	}
}

// vim: ts=4
