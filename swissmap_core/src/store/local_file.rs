//! Local JSON file backend.
//!
//! The whole collection lives in one file holding a JSON array of features. Every mutation reads
//! the full array, changes it and writes the full array back.
//!
//! All operations of one `LocalFileStore` value are serialized through an async mutex, so within
//! a process every mutation sees all earlier ones. Nothing coordinates with other processes
//! writing the same file: their writes race, the last writer wins, and a concurrent reader may
//! observe a partially written file.

use super::{FeatureStore, StoreBackend};
use crate::{Feature, FeaturePatch, StoreError};
use async_trait::async_trait;
use std::{
	io::ErrorKind,
	path::{Path, PathBuf},
};
use tokio::{fs, sync::Mutex};

#[derive(Debug)]
pub struct LocalFileStore {
	path: PathBuf,
	lock: Mutex<()>,
}

impl LocalFileStore {
	/// Creates a store backed by `path`. The file is created lazily on first access.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		LocalFileStore {
			path: path.into(),
			lock: Mutex::new(()),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn io_error(&self, source: std::io::Error) -> StoreError {
		StoreError::Io {
			path: self.path.clone(),
			source,
		}
	}

	/// Creates the parent directory and an empty array if the file does not exist yet.
	async fn ensure_file(&self) -> Result<(), StoreError> {
		if fs::try_exists(&self.path).await.map_err(|e| self.io_error(e))? {
			return Ok(());
		}
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).await.map_err(|e| self.io_error(e))?;
		}
		log::info!("creating empty data file {:?}", self.path);
		fs::write(&self.path, "[]").await.map_err(|e| self.io_error(e))
	}

	async fn read_all(&self) -> Result<Vec<Feature>, StoreError> {
		self.ensure_file().await?;
		let text = match fs::read_to_string(&self.path).await {
			Ok(text) => text,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
			Err(e) => return Err(self.io_error(e)),
		};
		serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
			path: self.path.clone(),
			source,
		})
	}

	async fn write_all(&self, features: &[Feature]) -> Result<(), StoreError> {
		let text = serde_json::to_string_pretty(features)?;
		fs::write(&self.path, text).await.map_err(|e| self.io_error(e))
	}
}

#[async_trait]
impl FeatureStore for LocalFileStore {
	fn backend(&self) -> StoreBackend {
		StoreBackend::LocalJson
	}

	async fn list(&self) -> Result<Vec<Feature>, StoreError> {
		let _guard = self.lock.lock().await;
		self.read_all().await
	}

	async fn get(&self, id: &str) -> Result<Feature, StoreError> {
		let _guard = self.lock.lock().await;
		self
			.read_all()
			.await?
			.into_iter()
			.find(|f| f.id == id)
			.ok_or_else(|| StoreError::not_found(id))
	}

	async fn upsert_many(&self, items: Vec<FeaturePatch>) -> Result<Vec<String>, StoreError> {
		let mut ids = Vec::with_capacity(items.len());

		// One read-modify-write cycle per item, in input order.
		for item in items {
			let id = item.id_or_generate();
			let _guard = self.lock.lock().await;
			let mut features = self.read_all().await?;
			match features.iter_mut().find(|f| f.id == id) {
				Some(existing) => existing.merge(item),
				None => features.push(Feature::from_patch(&id, item)),
			}
			self.write_all(&features).await?;
			log::debug!("upserted feature {id} into {:?}", self.path);
			ids.push(id);
		}

		Ok(ids)
	}

	async fn update(&self, id: &str, patch: FeaturePatch) -> Result<Feature, StoreError> {
		let _guard = self.lock.lock().await;
		let mut features = self.read_all().await?;
		let feature = features
			.iter_mut()
			.find(|f| f.id == id)
			.ok_or_else(|| StoreError::not_found(id))?;
		feature.merge(patch);
		let updated = feature.clone();
		self.write_all(&features).await?;
		Ok(updated)
	}

	async fn delete(&self, id: &str) -> Result<(), StoreError> {
		let _guard = self.lock.lock().await;
		let mut features = self.read_all().await?;
		let index = features
			.iter()
			.position(|f| f.id == id)
			.ok_or_else(|| StoreError::not_found(id))?;
		features.remove(index);
		self.write_all(&features).await
	}
}
