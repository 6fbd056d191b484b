//! Adapter that persists settings records.
//!
//! A record is an arbitrary JSON value stored under a fixed key. Writes
//! replace the whole record; the adapter's own atomicity is the only
//! concurrency guarantee (last write wins).

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

#[async_trait]
pub trait StoreAdapter: Debug + Send + Sync {
	/// Reads a record, `None` if it was never written
	async fn read_setting(&self, key: &str) -> ClResult<Option<serde_json::Value>>;

	/// Replaces a record
	async fn update_setting(&self, key: &str, value: serde_json::Value) -> ClResult<()>;
}

// vim: ts=4
