//! Settings store keeping one JSON document per key in a directory.
//!
//! Writes go to a temporary file which is then renamed over the record, so
//! readers see either the old or the new document.

use std::{
	fmt::Debug,
	path::{Path, PathBuf},
	sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use tokio::{
	fs::{File, create_dir_all, read, remove_file, rename},
	io::AsyncWriteExt,
};

use hiatus::{prelude::*, store_adapter};

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Keys map to file names, so only a conservative character set is accepted
fn record_path(base_dir: &Path, key: &str) -> ClResult<PathBuf> {
	let valid = !key.is_empty()
		&& !key.starts_with('.')
		&& key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
	if !valid {
		Err(Error::ValidationError(format!("invalid settings key: {:?}", key)))?
	}

	Ok(base_dir.join(format!("{}.json", key)))
}

fn tmp_path(base_dir: &Path, key: &str) -> PathBuf {
	let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
	base_dir.join(format!(".{}.tmp-{}-{}", key, std::process::id(), seq))
}

#[derive(Debug)]
pub struct StoreAdapterFs {
	base_dir: Box<Path>,
}

impl StoreAdapterFs {
	pub async fn new(base_dir: Box<Path>) -> Result<Self, Error> {
		create_dir_all(&base_dir).await?;
		Ok(Self { base_dir })
	}
}

#[async_trait]
impl store_adapter::StoreAdapter for StoreAdapterFs {
	async fn read_setting(&self, key: &str) -> ClResult<Option<serde_json::Value>> {
		let path = record_path(&self.base_dir, key)?;
		let data = match read(&path).await {
			Ok(data) => data,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(err.into()),
		};

		let value = serde_json::from_slice(&data).map_err(|err| {
			warn!("Settings record {:?} is not valid JSON: {}", path, err);
			Error::Json(err)
		})?;
		Ok(Some(value))
	}

	async fn update_setting(&self, key: &str, value: serde_json::Value) -> ClResult<()> {
		let path = record_path(&self.base_dir, key)?;
		let tmp_path = tmp_path(&self.base_dir, key);
		let data = serde_json::to_vec_pretty(&value)?;

		let res = async {
			let mut file = File::create(&tmp_path).await?;
			file.write_all(&data).await?;
			file.sync_all().await?;
			rename(&tmp_path, &path).await?;
			Ok::<(), Error>(())
		}
		.await;

		if let Err(err) = res {
			warn!("Writing settings record {:?} failed: {}", path, err);
			if let Err(rm_err) = remove_file(&tmp_path).await {
				debug!("Cannot remove temporary file {:?}: {}", tmp_path, rm_err);
			}
			return Err(err);
		}

		debug!("Settings record written: {:?}", path);
		Ok(())
	}
}


// vim: ts=4
