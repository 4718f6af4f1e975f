//! HTTP handlers for diagnostics, the places relay and feature CRUD.
//!
//! Handlers stay thin: they parse input, call the relay or the store and hand results to
//! [`ApiError`] / [`relay_response`] for translation. CORS headers are added by the `CorsLayer`.
//!
//! Extractors are taken as `Result` so their rejections leave as JSON errors too.

use super::response::{ApiError, relay_response};
use crate::places::{NearbyParams, PlacesRelay, TextParams, from_query_pairs};
use axum::{
	Json,
	body::Bytes,
	extract::{
		Path, Query, State,
		rejection::{BytesRejection, PathRejection, QueryRejection},
	},
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use swissmap_core::{Feature, FeaturePatch, StoreError, store::FeatureStoreArc};

/// Shared state of all handlers.
#[derive(Clone)]
pub struct AppState {
	pub store: FeatureStoreArc,
	pub relay: Arc<PlacesRelay>,
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
	Json(json!({
		"ok": true,
		"hasKey": state.relay.has_key(),
		"backend": state.store.backend().as_str(),
		"base": state.relay.base_url(),
	}))
}

type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;
type IdPath = Result<Path<String>, PathRejection>;
type BodyBytes = Result<Bytes, BytesRejection>;

pub async fn places_nearby(State(state): State<AppState>, query: QueryPairs) -> Result<Response, ApiError> {
	let params: NearbyParams = query_params(query)?;
	log::debug!("nearby search {params:?}");
	Ok(relay_response(state.relay.nearby(&params).await?))
}

pub async fn places_search_text(State(state): State<AppState>, query: QueryPairs) -> Result<Response, ApiError> {
	let params: TextParams = query_params(query)?;
	log::debug!("text search {params:?}");
	Ok(relay_response(state.relay.search_text(&params).await?))
}

pub async fn list_features(State(state): State<AppState>) -> Result<Json<Vec<Feature>>, ApiError> {
	Ok(Json(state.store.list().await?))
}

pub async fn get_feature(State(state): State<AppState>, path: IdPath) -> Result<Json<Feature>, ApiError> {
	let Path(id) = path?;
	Ok(Json(state.store.get(&id).await?))
}

/// Creates one feature (object body) or many (array body).
pub async fn create_features(State(state): State<AppState>, body: BodyBytes) -> Result<Response, ApiError> {
	match parse_body(&body?)? {
		Value::Array(items) => {
			let patches = items.into_iter().map(to_patch).collect::<Result<Vec<_>, _>>()?;
			let ids = state.store.upsert_many(patches).await?;
			log::debug!("saved {} features", ids.len());
			Ok((StatusCode::CREATED, Json(json!({ "saved": ids, "count": ids.len() }))).into_response())
		}
		value => {
			let ids = state.store.upsert_many(vec![to_patch(value)?]).await?;
			let id = ids.first().ok_or_else(|| StoreError::Decode("store returned no id".into()))?;
			let feature = state.store.get(id).await?;
			log::debug!("saved feature {id}");
			Ok((StatusCode::CREATED, Json(feature)).into_response())
		}
	}
}

/// Merge-writes the body into the feature at `id`. The path id wins over any id in the body.
pub async fn update_feature(
	State(state): State<AppState>,
	path: IdPath,
	body: BodyBytes,
) -> Result<Json<Feature>, ApiError> {
	let Path(id) = path?;
	let patch = to_patch(parse_body(&body?)?)?;
	Ok(Json(state.store.update(&id, patch).await?))
}

pub async fn delete_feature(State(state): State<AppState>, path: IdPath) -> Result<Json<Value>, ApiError> {
	let Path(id) = path?;
	state.store.delete(&id).await?;
	log::debug!("deleted feature {id}");
	Ok(Json(json!({ "id": id, "deleted": true })))
}

pub async fn not_found() -> ApiError {
	ApiError::NotFound
}

fn query_params<T: DeserializeOwned>(query: QueryPairs) -> Result<T, ApiError> {
	let Query(pairs) = query?;
	from_query_pairs(pairs).map_err(|e| ApiError::BadRequest(format!("invalid query: {e}")))
}

fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
	serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))
}

fn to_patch(value: Value) -> Result<FeaturePatch, ApiError> {
	if !value.is_object() {
		return Err(ApiError::BadRequest("expected a feature object".to_owned()));
	}
	serde_json::from_value(value).map_err(|e| ApiError::BadRequest(format!("invalid feature: {e}")))
}
