//! Feature storage backends.
//!
//! This module defines the object-safe [`FeatureStore`] trait. A process activates exactly one
//! implementation at start-up and shares it as [`FeatureStoreArc`]:
//! - [`LocalFileStore`]: one JSON array on disk, rewritten on every mutation
//! - [`FirestoreStore`]: a Firestore collection (feature `firestore`)
//!
//! ### Contract shared by all backends
//! * `upsert_many` assigns ids to items without one and merge-writes every item. It returns the
//!   ids in input order.
//! * `update` and `delete` are strict: a missing id yields [`StoreError::NotFound`].
//! * Merge writes set only the top-level fields present in the [`FeaturePatch`].

mod local_file;
pub use local_file::LocalFileStore;

#[cfg(feature = "firestore")]
mod firestore;
#[cfg(feature = "firestore")]
pub use firestore::{FirestoreConfig, FirestoreStore, StaticToken, TokenSource};

use crate::{Feature, FeaturePatch, StoreError};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

/// Shared handle to the active store.
pub type FeatureStoreArc = Arc<dyn FeatureStore>;

/// Identifies which backend a store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
	LocalJson,
	Firestore,
}

impl StoreBackend {
	/// The name reported by diagnostics (`local-json` or `firestore`).
	pub fn as_str(&self) -> &'static str {
		match self {
			StoreBackend::LocalJson => "local-json",
			StoreBackend::Firestore => "firestore",
		}
	}
}

impl std::fmt::Display for StoreBackend {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Object-safe CRUD interface over a collection of features.
#[async_trait]
pub trait FeatureStore: Debug + Send + Sync {
	/// Which backend this store uses.
	fn backend(&self) -> StoreBackend;

	/// Returns every feature. No ordering guarantee.
	async fn list(&self) -> Result<Vec<Feature>, StoreError>;

	/// Returns the feature stored at `id`.
	async fn get(&self, id: &str) -> Result<Feature, StoreError>;

	/// Merge-writes every item, generating ids where missing. Returns the written ids in input order.
	async fn upsert_many(&self, items: Vec<FeaturePatch>) -> Result<Vec<String>, StoreError>;

	/// Merge-writes `patch` into the existing feature at `id` and returns the result.
	///
	/// The id inside `patch` is ignored.
	async fn update(&self, id: &str, patch: FeaturePatch) -> Result<Feature, StoreError>;

	/// Removes the feature at `id`.
	async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
