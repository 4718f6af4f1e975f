use std::path::PathBuf;
use thiserror::Error;

/// Error raised by a [`FeatureStore`](crate::store::FeatureStore).
///
/// Callers branch on `NotFound` and `InvalidId`; everything else is a storage failure that
/// should be surfaced as-is.
#[derive(Debug, Error)]
pub enum StoreError {
	/// The feature does not exist.
	#[error("feature '{id}' not found")]
	NotFound {
		/// Identifier that was looked up.
		id: String,
	},

	/// The backend cannot address a document by this id.
	#[error("invalid feature id '{id}': {reason}")]
	InvalidId { id: String, reason: &'static str },

	/// Reading or writing the local data file failed.
	#[error("failed to access data file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The local data file exists but is not a JSON array of features.
	#[error("data file {path} is not a valid feature array: {source}")]
	Corrupt {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to serialize features: {0}")]
	Serialize(#[from] serde_json::Error),

	/// The document database could not be reached.
	#[cfg(feature = "firestore")]
	#[error("document database request failed: {0}")]
	Http(#[from] reqwest::Error),

	/// The document database answered with a non-success status.
	#[error("document database returned HTTP {status}: {message}")]
	Upstream { status: u16, message: String },

	/// No access token could be obtained for the document database.
	#[error("document database authentication failed: {0}")]
	Auth(String),

	/// A stored document could not be turned into a feature.
	#[error("malformed document: {0}")]
	Decode(String),
}

impl StoreError {
	pub fn not_found(id: &str) -> Self {
		StoreError::NotFound { id: id.to_owned() }
	}

	pub fn invalid_id(id: &str, reason: &'static str) -> Self {
		StoreError::InvalidId {
			id: id.to_owned(),
			reason,
		}
	}

	pub fn is_not_found(&self) -> bool {
		matches!(self, StoreError::NotFound { .. })
	}

	pub fn is_invalid_id(&self) -> bool {
		matches!(self, StoreError::InvalidId { .. })
	}
}
