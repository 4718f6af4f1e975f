//! Firestore backend, talking to the Firestore REST API (v1) with `reqwest`.
//!
//! Documents live at `projects/{project}/databases/{database}/documents/{collection}/{id}`.
//! Writes go through `documents:commit`:
//! - `upsert_many` sends all items as one atomic commit with an update mask (merge write)
//! - `update` and `delete` add the precondition `exists: true`, so a missing id fails inside
//!   Firestore and is reported as [`StoreError::NotFound`]
//!
//! Access tokens come from a [`TokenSource`]. [`FirestoreStore::connect`] builds one from inline
//! service-account JSON or from ambient Google credentials via `gcp_auth`.

mod value;

use super::{FeatureStore, StoreBackend};
use crate::{Feature, FeaturePatch, StoreError};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url, header};
use serde_json::{Value, json};
use std::{fmt::Debug, sync::Arc};

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_DATABASE: &str = "(default)";
const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const PAGE_SIZE: u32 = 300;

/// Supplies OAuth access tokens for Firestore requests.
#[async_trait]
pub trait TokenSource: Debug + Send + Sync {
	async fn token(&self) -> Result<String, StoreError>;
}

/// A fixed token, for emulators and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
	async fn token(&self) -> Result<String, StoreError> {
		Ok(self.0.clone())
	}
}

struct GcpTokenSource {
	provider: Arc<dyn gcp_auth::TokenProvider>,
}

impl Debug for GcpTokenSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("GcpTokenSource")
	}
}

#[async_trait]
impl TokenSource for GcpTokenSource {
	async fn token(&self) -> Result<String, StoreError> {
		let token = self.provider.token(&[DATASTORE_SCOPE]).await.map_err(auth_error)?;
		Ok(token.as_str().to_owned())
	}
}

fn auth_error(err: gcp_auth::Error) -> StoreError {
	StoreError::Auth(err.to_string())
}

/// Location of the feature collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FirestoreConfig {
	pub base_url: String,
	pub project_id: String,
	pub database: String,
	pub collection: String,
}

impl FirestoreConfig {
	pub fn new(project_id: &str, collection: &str) -> Self {
		FirestoreConfig {
			base_url: DEFAULT_BASE_URL.to_owned(),
			project_id: project_id.to_owned(),
			database: DEFAULT_DATABASE.to_owned(),
			collection: collection.to_owned(),
		}
	}

	pub fn with_base_url(mut self, base_url: &str) -> Self {
		self.base_url = base_url.trim_end_matches('/').to_owned();
		self
	}

	/// `projects/{p}/databases/{d}/documents`
	fn documents_root(&self) -> String {
		format!("projects/{}/databases/{}/documents", self.project_id, self.database)
	}

	fn collection_path(&self) -> String {
		format!("{}/{}", self.documents_root(), self.collection)
	}

	fn document_name(&self, id: &str) -> String {
		format!("{}/{}", self.collection_path(), id)
	}

	fn url(&self, path: &str) -> Result<Url, StoreError> {
		Url::parse(&format!("{}/{}", self.base_url, path))
			.map_err(|e| StoreError::Decode(format!("invalid Firestore url for '{path}': {e}")))
	}

	/// URL of a single document. The id becomes one percent-encoded path segment.
	fn document_url(&self, id: &str) -> Result<Url, StoreError> {
		let mut url = self.url(&self.collection_path())?;
		url.path_segments_mut()
			.map_err(|()| StoreError::Decode(format!("Firestore base url '{}' cannot hold a path", self.base_url)))?
			.push(id);
		Ok(url)
	}
}

/// Firestore document ids must be non-empty, must not contain `/`, must not be `.` or `..`
/// and must not look like `__reserved__`.
fn check_id(id: &str) -> Result<(), StoreError> {
	let reason = if id.is_empty() {
		"must not be empty"
	} else if id.contains('/') {
		"must not contain '/'"
	} else if id == "." || id == ".." {
		"must not be '.' or '..'"
	} else if id.len() > 4 && id.starts_with("__") && id.ends_with("__") {
		"must not start and end with '__'"
	} else {
		return Ok(());
	};
	Err(StoreError::invalid_id(id, reason))
}

#[derive(Debug)]
pub struct FirestoreStore {
	client: Client,
	config: FirestoreConfig,
	tokens: Arc<dyn TokenSource>,
}

impl FirestoreStore {
	pub fn new(config: FirestoreConfig, tokens: Arc<dyn TokenSource>) -> Result<Self, StoreError> {
		let client = Client::builder().build()?;
		Ok(FirestoreStore { client, config, tokens })
	}

	/// Sets up credentials and verifies them by fetching one access token.
	///
	/// Uses `service_account_json` when given, otherwise ambient credentials
	/// (`GOOGLE_APPLICATION_CREDENTIALS`, gcloud, or the metadata server). The project id is taken
	/// from `project_id` or, if absent, from the credentials.
	pub async fn connect(
		service_account_json: Option<&str>,
		project_id: Option<&str>,
		collection: &str,
	) -> Result<Self, StoreError> {
		let provider: Arc<dyn gcp_auth::TokenProvider> = match service_account_json {
			Some(json) => Arc::new(gcp_auth::CustomServiceAccount::from_json(json).map_err(auth_error)?),
			None => gcp_auth::provider().await.map_err(auth_error)?,
		};

		let project_id = match project_id {
			Some(id) => id.to_owned(),
			None => provider.project_id().await.map_err(auth_error)?.to_string(),
		};

		let tokens = GcpTokenSource { provider };
		tokens.token().await?;

		log::info!("connected to Firestore project '{project_id}', collection '{collection}'");
		FirestoreStore::new(FirestoreConfig::new(&project_id, collection), Arc::new(tokens))
	}

	async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, StoreError> {
		let token = self.tokens.token().await?;
		Ok(self.client.request(method, url).bearer_auth(token))
	}

	async fn get_document(&self, id: &str) -> Result<Feature, StoreError> {
		check_id(id)?;
		let url = self.config.document_url(id)?;
		let response = self.request(Method::GET, url).await?.send().await?;
		if response.status() == StatusCode::NOT_FOUND {
			return Err(StoreError::not_found(id));
		}
		let document = read_json(response).await?;
		value::decode_document(&document)
	}

	/// Sends all writes as one atomic commit.
	///
	/// With `strict_id`, a failed `exists` precondition is reported as `NotFound` for that id.
	async fn commit(&self, writes: Vec<Value>, strict_id: Option<&str>) -> Result<(), StoreError> {
		let url = self.config.url(&format!("{}:commit", self.config.documents_root()))?;
		let body = serde_json::to_vec(&json!({ "writes": writes }))?;
		let response = self
			.request(Method::POST, url)
			.await?
			.header(header::CONTENT_TYPE, "application/json")
			.body(body)
			.send()
			.await?;

		match (read_json(response).await, strict_id) {
			(Ok(_), _) => Ok(()),
			(Err(StoreError::Upstream { status, message }), Some(id)) if is_missing_document(status, &message) => {
				log::debug!("precondition failed for {id}: {message}");
				Err(StoreError::not_found(id))
			}
			(Err(err), _) => Err(err),
		}
	}

	fn update_write(&self, id: &str, patch: &FeaturePatch) -> Value {
		let mut field_paths = vec!["id"];
		field_paths.extend(patch.field_names());
		json!({
			"update": {
				"name": self.config.document_name(id),
				"fields": value::encode_patch(id, patch),
			},
			"updateMask": { "fieldPaths": field_paths },
		})
	}
}

fn is_missing_document(status: u16, message: &str) -> bool {
	status == 404 || message.contains("NOT_FOUND") || message.contains("FAILED_PRECONDITION")
}

/// Parses a success body, or turns an error response into `StoreError::Upstream`.
async fn read_json(response: Response) -> Result<Value, StoreError> {
	let status = response.status();
	let text = response.text().await?;

	if !status.is_success() {
		// Firestore errors look like {"error": {"code", "message", "status"}}
		let message = serde_json::from_str::<Value>(&text)
			.ok()
			.and_then(|v| {
				let error = v.get("error")?;
				Some(format!(
					"{}: {}",
					error.get("status")?.as_str()?,
					error.get("message").and_then(Value::as_str).unwrap_or_default()
				))
			})
			.unwrap_or(text);
		return Err(StoreError::Upstream {
			status: status.as_u16(),
			message,
		});
	}

	if text.trim().is_empty() {
		return Ok(Value::Null);
	}
	Ok(serde_json::from_str(&text)?)
}

#[async_trait]
impl FeatureStore for FirestoreStore {
	fn backend(&self) -> StoreBackend {
		StoreBackend::Firestore
	}

	async fn list(&self) -> Result<Vec<Feature>, StoreError> {
		let path = self.config.collection_path();
		let mut features = Vec::new();
		let mut page_token: Option<String> = None;

		loop {
			let mut url = self.config.url(&path)?;
			url.query_pairs_mut().append_pair("pageSize", &PAGE_SIZE.to_string());
			if let Some(token) = &page_token {
				url.query_pairs_mut().append_pair("pageToken", token);
			}

			let response = self.request(Method::GET, url).await?.send().await?;
			let page = read_json(response).await?;

			if let Some(documents) = page.get("documents").and_then(Value::as_array) {
				for document in documents {
					features.push(value::decode_document(document)?);
				}
			}

			page_token = page
				.get("nextPageToken")
				.and_then(Value::as_str)
				.filter(|t| !t.is_empty())
				.map(str::to_owned);
			if page_token.is_none() {
				break;
			}
		}

		log::debug!("listed {} features from Firestore", features.len());
		Ok(features)
	}

	async fn get(&self, id: &str) -> Result<Feature, StoreError> {
		self.get_document(id).await
	}

	async fn upsert_many(&self, items: Vec<FeaturePatch>) -> Result<Vec<String>, StoreError> {
		if items.is_empty() {
			return Ok(Vec::new());
		}

		let mut ids = Vec::with_capacity(items.len());
		let mut writes = Vec::with_capacity(items.len());
		for item in &items {
			let id = item.id_or_generate();
			check_id(&id)?;
			writes.push(self.update_write(&id, item));
			ids.push(id);
		}

		self.commit(writes, None).await?;
		log::debug!("committed {} features to Firestore", ids.len());
		Ok(ids)
	}

	async fn update(&self, id: &str, patch: FeaturePatch) -> Result<Feature, StoreError> {
		check_id(id)?;
		let mut write = self.update_write(id, &patch);
		write["currentDocument"] = json!({ "exists": true });
		self.commit(vec![write], Some(id)).await?;
		self.get_document(id).await
	}

	async fn delete(&self, id: &str) -> Result<(), StoreError> {
		check_id(id)?;
		let write = json!({
			"delete": self.config.document_name(id),
			"currentDocument": { "exists": true },
		});
		self.commit(vec![write], Some(id)).await
	}
}
