//! Selects the feature store for the lifetime of the process.

use crate::config::{StorageBackendKind, StorageConfig};
use std::sync::Arc;
use swissmap_core::store::{FeatureStoreArc, FirestoreStore, LocalFileStore};

/// Opens the configured backend.
///
/// Firestore is only used when it can be set up completely. Any failure (missing or malformed
/// credentials, no project id, token fetch) is logged and the local JSON file is used instead,
/// so the returned store is always usable.
pub async fn open_store(config: &StorageConfig) -> FeatureStoreArc {
	if config.backend == StorageBackendKind::Firestore {
		match FirestoreStore::connect(
			config.service_account_json.as_deref(),
			config.project_id.as_deref(),
			&config.collection,
		)
		.await
		{
			Ok(store) => return Arc::new(store),
			Err(err) => log::error!(
				"Firestore unavailable ({err}), falling back to local file {:?}",
				config.data_file
			),
		}
	}

	log::info!("storing features in {:?}", config.data_file);
	Arc::new(LocalFileStore::new(&config.data_file))
}
