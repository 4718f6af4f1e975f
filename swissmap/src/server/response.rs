//! Translation of domain results into HTTP responses.
//!
//! Every failure leaves the server as a JSON object:
//! - store `NotFound` → 404 `{"error": …}`
//! - ids the store cannot address → 400 `{"error": …}`
//! - other store failures and a missing API key → 500 `{"error": …}`
//! - relay transport failures → 500 `{"proxyError": …}`
//! - unparsable request bodies → 400 `{"error": …}`
//! - extractor rejections (oversized body, undecodable path or query) keep their status
//! - caught panics → 500 `{"error": …}`

use crate::places::{RelayError, RelayResponse};
use axum::{
	Json,
	extract::rejection::{BytesRejection, PathRejection, QueryRejection},
	http::{HeaderValue, StatusCode, header},
	response::{IntoResponse, Response},
};
use serde_json::json;
use swissmap_core::StoreError;

#[derive(Debug)]
pub enum ApiError {
	Store(StoreError),
	Relay(RelayError),
	BadRequest(String),
	Internal(String),
	Rejected(StatusCode, String),
	NotFound,
}

impl From<BytesRejection> for ApiError {
	fn from(rejection: BytesRejection) -> Self {
		ApiError::Rejected(rejection.status(), rejection.body_text())
	}
}

impl From<PathRejection> for ApiError {
	fn from(rejection: PathRejection) -> Self {
		ApiError::Rejected(rejection.status(), rejection.body_text())
	}
}

impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		ApiError::Rejected(rejection.status(), rejection.body_text())
	}
}

impl From<StoreError> for ApiError {
	fn from(err: StoreError) -> Self {
		ApiError::Store(err)
	}
}

impl From<RelayError> for ApiError {
	fn from(err: RelayError) -> Self {
		ApiError::Relay(err)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		match self {
			ApiError::Store(err) if err.is_not_found() => {
				log::debug!("{err}");
				error_json(StatusCode::NOT_FOUND, "error", err.to_string())
			}
			ApiError::Store(err) if err.is_invalid_id() => error_json(StatusCode::BAD_REQUEST, "error", err.to_string()),
			ApiError::Store(err) => {
				log::warn!("storage failure: {err}");
				error_json(StatusCode::INTERNAL_SERVER_ERROR, "error", err.to_string())
			}
			ApiError::Relay(RelayError::Transport(err)) => {
				log::warn!("places request failed: {err}");
				error_json(StatusCode::INTERNAL_SERVER_ERROR, "proxyError", err.to_string())
			}
			ApiError::Relay(err) => error_json(StatusCode::INTERNAL_SERVER_ERROR, "error", err.to_string()),
			ApiError::BadRequest(message) => error_json(StatusCode::BAD_REQUEST, "error", message),
			ApiError::Internal(message) => error_json(StatusCode::INTERNAL_SERVER_ERROR, "error", message),
			ApiError::Rejected(status, message) => {
				log::debug!("request rejected with {status}: {message}");
				error_json(status, "error", message)
			}
			ApiError::NotFound => error_json(StatusCode::NOT_FOUND, "error", "Not Found".to_owned()),
		}
	}
}

fn error_json(status: StatusCode, key: &str, message: String) -> Response {
	(status, Json(json!({ key: message }))).into_response()
}

/// Relays an upstream answer with its status, content type and body unchanged.
pub fn relay_response(upstream: RelayResponse) -> Response {
	let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
	let content_type = upstream
		.content_type
		.as_deref()
		.and_then(|v| HeaderValue::from_str(v).ok())
		.unwrap_or_else(|| HeaderValue::from_static("application/json"));

	(status, [(header::CONTENT_TYPE, content_type)], upstream.body).into_response()
}
