//! Feature store selection.
//!
//! # Example YAML
//! ```yaml
//! storage:
//!   backend: firestore      # or "local" (default)
//!   collection: features
//!   project_id: my-project  # optional, defaults to the credential's project
//!   data_file: data/features.json
//! ```
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "data/features.json";
pub const DEFAULT_COLLECTION: &str = "features";

#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
	#[default]
	Local,
	Firestore,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
	/// Which backend to activate at start-up.
	pub backend: StorageBackendKind,

	/// JSON file used by the local backend, and as fallback when Firestore cannot be set up.
	pub data_file: PathBuf,

	/// Firestore collection holding the features.
	pub collection: String,

	/// Firestore project. Taken from the credentials when unset.
	pub project_id: Option<String>,

	/// Inline service-account JSON. Ambient Google credentials are used when unset.
	pub service_account_json: Option<String>,
}

impl Default for StorageConfig {
	fn default() -> Self {
		StorageConfig {
			backend: StorageBackendKind::Local,
			data_file: PathBuf::from(DEFAULT_DATA_FILE),
			collection: DEFAULT_COLLECTION.to_owned(),
			project_id: None,
			service_account_json: None,
		}
	}
}

impl StorageConfig {
	pub fn resolve_paths(&mut self, base: &Path) {
		if self.data_file.is_relative() && !base.as_os_str().is_empty() {
			self.data_file = base.join(&self.data_file);
		}
	}

	pub fn override_use_firestore(&mut self, use_firestore: bool) {
		if use_firestore {
			self.backend = StorageBackendKind::Firestore;
		}
	}
	pub fn override_optional_collection(&mut self, collection: &Option<String>) {
		if let Some(collection) = collection.as_ref().filter(|c| !c.is_empty()) {
			self.collection = collection.clone();
		}
	}
	pub fn override_optional_project_id(&mut self, project_id: &Option<String>) {
		if let Some(project_id) = project_id.as_ref().filter(|p| !p.is_empty()) {
			self.project_id = Some(project_id.clone());
		}
	}
	pub fn override_optional_service_account_json(&mut self, json: &Option<String>) {
		if let Some(json) = json.as_ref().filter(|j| !j.trim().is_empty()) {
			self.service_account_json = Some(json.clone());
		}
	}
	pub fn override_optional_data_file(&mut self, data_file: &Option<PathBuf>) {
		if let Some(data_file) = data_file {
			self.data_file = data_file.clone();
		}
	}
}
