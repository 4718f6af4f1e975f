//! Forwards search requests to the places API and hands back its raw answer.
//!
//! The relay adds the server's API key and the field mask, issues exactly one POST and returns
//! the upstream status, content type and body untouched. Upstream error statuses are relayed,
//! not translated. Only a missing key or a transport failure is an error on our side.

use super::{NearbyParams, TextParams};
use crate::config::PlacesConfig;
use reqwest::{Client, header};
use serde_json::Value;
use thiserror::Error;

pub const NEARBY_ENDPOINT: &str = "places:searchNearby";
pub const TEXT_ENDPOINT: &str = "places:searchText";

#[derive(Debug, Error)]
pub enum RelayError {
	/// No API key is configured; nothing was sent upstream.
	#[error("Server missing MAPS_KEY")]
	MissingApiKey,

	/// The places API could not be reached.
	#[error("{0}")]
	Transport(#[from] reqwest::Error),

	#[error("failed to encode search request: {0}")]
	Encode(#[from] serde_json::Error),
}

/// An upstream answer, relayed verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
	pub status: u16,
	pub content_type: Option<String>,
	pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct PlacesRelay {
	client: Client,
	config: PlacesConfig,
}

impl PlacesRelay {
	pub fn new(config: PlacesConfig) -> Result<Self, RelayError> {
		let client = Client::builder().build()?;
		Ok(PlacesRelay { client, config })
	}

	pub fn has_key(&self) -> bool {
		self.config.has_key()
	}

	pub fn base_url(&self) -> &str {
		&self.config.base_url
	}

	/// Relays a nearby search.
	pub async fn nearby(&self, params: &NearbyParams) -> Result<RelayResponse, RelayError> {
		let key = self.config.api_key().ok_or(RelayError::MissingApiKey)?;
		self.forward(key, NEARBY_ENDPOINT, &params.to_body(&self.config)).await
	}

	/// Relays a text search.
	pub async fn search_text(&self, params: &TextParams) -> Result<RelayResponse, RelayError> {
		let key = self.config.api_key().ok_or(RelayError::MissingApiKey)?;
		self.forward(key, TEXT_ENDPOINT, &params.to_body(&self.config)).await
	}

	async fn forward(&self, key: &str, endpoint: &str, body: &Value) -> Result<RelayResponse, RelayError> {
		let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
		log::debug!("relay {endpoint}: {body}");

		let response = self
			.client
			.post(&url)
			.header(header::CONTENT_TYPE, "application/json")
			.header("X-Goog-Api-Key", key)
			.header("X-Goog-FieldMask", &self.config.field_mask)
			.body(serde_json::to_vec(body)?)
			.send()
			.await?;

		let status = response.status().as_u16();
		let content_type = response
			.headers()
			.get(header::CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
			.map(str::to_owned);
		let body = response.bytes().await?.to_vec();

		if status >= 400 {
			log::warn!("upstream {endpoint} answered HTTP {status}");
		}

		Ok(RelayResponse {
			status,
			content_type,
			body,
		})
	}
}
