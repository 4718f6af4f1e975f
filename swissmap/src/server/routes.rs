//! Router composition.
//!
//! Wires handlers to paths without any lifecycle or middleware concerns; those live in
//! [`SwissMapServer`](super::SwissMapServer).

use super::handlers::{self, AppState};
use axum::{Router, routing::get};

pub fn build_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(handlers::health))
		.route("/placesNearby", get(handlers::places_nearby))
		.route("/placesSearchText", get(handlers::places_search_text))
		.route("/api/features", get(handlers::list_features).post(handlers::create_features))
		.route(
			"/api/features/{id}",
			get(handlers::get_feature)
				.put(handlers::update_feature)
				.delete(handlers::delete_feature),
		)
		.fallback(handlers::not_found)
		.with_state(state)
}

// --- tests -------------------------------------------------------------------
#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		config::PlacesConfig,
		places::{PlacesRelay, mock::MockPlaces},
	};
	use axum::{
		body::Body,
		http::{Method, Request, StatusCode, header},
	};
	use pretty_assertions::assert_eq;
	use serde_json::{Value, json};
	use std::sync::Arc;
	use swissmap_core::store::LocalFileStore;
	use tempfile::TempDir;
	use tower::ServiceExt as _;

	struct TestApp {
		router: Router,
		_dir: TempDir,
	}

	impl TestApp {
		fn new(places: PlacesConfig) -> TestApp {
			let dir = tempfile::tempdir().unwrap();
			let state = AppState {
				store: Arc::new(LocalFileStore::new(dir.path().join("features.json"))),
				relay: Arc::new(PlacesRelay::new(places).unwrap()),
			};
			TestApp {
				router: build_router(state),
				_dir: dir,
			}
		}

		async fn send(&self, method: Method, path: &str, body: Option<&str>) -> (StatusCode, Value) {
			let mut req = Request::builder().method(method).uri(path);
			if body.is_some() {
				req = req.header(header::CONTENT_TYPE, "application/json");
			}
			let req = req.body(body.map_or_else(Body::empty, |b| Body::from(b.to_owned()))).unwrap();

			let res = self.router.clone().oneshot(req).await.unwrap();
			let status = res.status();
			let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
			let value = if bytes.is_empty() {
				Value::Null
			} else {
				serde_json::from_slice(&bytes).unwrap()
			};
			(status, value)
		}
	}

	#[tokio::test]
	async fn health_reports_backend_and_key() {
		let app = TestApp::new(PlacesConfig::default());
		let (status, body) = app.send(Method::GET, "/health", None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(
			body,
			json!({"ok": true, "hasKey": false, "backend": "local-json", "base": "https://places.googleapis.com/v1"})
		);
	}

	#[tokio::test]
	async fn create_get_delete_round_trip() {
		let app = TestApp::new(PlacesConfig::default());

		let (status, created) = app
			.send(
				Method::POST,
				"/api/features",
				Some(r#"{"type":"poi","geometry":{"type":"Point","coordinates":[8.0,47.0]},"properties":{"name":"Rigi"}}"#),
			)
			.await;
		assert_eq!(status, StatusCode::CREATED);
		let id = created["id"].as_str().unwrap().to_owned();
		assert!(id.starts_with("f_"));
		assert_eq!(created["properties"], json!({"name": "Rigi"}));

		let (status, list) = app.send(Method::GET, "/api/features", None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(list, json!([created]));

		let (status, body) = app.send(Method::DELETE, &format!("/api/features/{id}"), None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, json!({"id": id, "deleted": true}));

		let (status, list) = app.send(Method::GET, "/api/features", None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(list, json!([]));

		let (status, body) = app.send(Method::GET, &format!("/api/features/{id}"), None).await;
		assert_eq!(status, StatusCode::NOT_FOUND);
		assert!(body["error"].is_string());
	}

	#[tokio::test]
	async fn bulk_create_returns_ids() {
		let app = TestApp::new(PlacesConfig::default());
		let (status, body) = app
			.send(
				Method::POST,
				"/api/features",
				Some(r#"[{"id":"a","type":"poi"},{"id":"b","type":"route"}]"#),
			)
			.await;
		assert_eq!(status, StatusCode::CREATED);
		assert_eq!(body, json!({"saved": ["a", "b"], "count": 2}));

		let (_, list) = app.send(Method::GET, "/api/features", None).await;
		assert_eq!(list.as_array().unwrap().len(), 2);
	}

	#[tokio::test]
	async fn update_merges_and_path_id_wins() {
		let app = TestApp::new(PlacesConfig::default());
		app.send(
			Method::POST,
			"/api/features",
			Some(r#"{"id":"x","type":"poi","properties":{"name":"old"}}"#),
		)
		.await;

		let (status, body) = app
			.send(
				Method::PUT,
				"/api/features/x",
				Some(r#"{"id":"other","properties":{"name":"new"}}"#),
			)
			.await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(
			body,
			json!({"id": "x", "type": "poi", "geometry": null, "properties": {"name": "new"}})
		);
	}

	#[tokio::test]
	async fn missing_ids_are_404() {
		let app = TestApp::new(PlacesConfig::default());
		app.send(Method::POST, "/api/features", Some(r#"{"id":"once"}"#)).await;

		let (status, _) = app.send(Method::DELETE, "/api/features/once", None).await;
		assert_eq!(status, StatusCode::OK);
		let (status, body) = app.send(Method::DELETE, "/api/features/once", None).await;
		assert_eq!(status, StatusCode::NOT_FOUND);
		assert!(body["error"].is_string());

		let (status, _) = app
			.send(Method::PUT, "/api/features/never", Some(r#"{"type":"poi"}"#))
			.await;
		assert_eq!(status, StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn malformed_body_is_400() {
		let app = TestApp::new(PlacesConfig::default());
		let (status, body) = app.send(Method::POST, "/api/features", Some("{nope")).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert!(body["error"].as_str().unwrap().starts_with("invalid JSON body"));

		let (status, _) = app.send(Method::POST, "/api/features", Some("42")).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn unknown_route_is_404_json() {
		let app = TestApp::new(PlacesConfig::default());
		let (status, body) = app.send(Method::GET, "/nowhere", None).await;
		assert_eq!(status, StatusCode::NOT_FOUND);
		assert_eq!(body, json!({"error": "Not Found"}));
	}

	#[tokio::test]
	async fn missing_key_never_reaches_upstream() {
		let upstream = MockPlaces::start(200, "{}").await;
		let app = TestApp::new(PlacesConfig {
			base_url: upstream.base_url.clone(),
			..Default::default()
		});

		for path in ["/placesNearby?lat=1&lng=2", "/placesSearchText?query=x"] {
			let (status, body) = app.send(Method::GET, path, None).await;
			assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
			assert_eq!(body, json!({"error": "Server missing MAPS_KEY"}));
		}
		assert!(upstream.requests().is_empty());
	}

	#[tokio::test]
	async fn places_answers_are_relayed() {
		let upstream = MockPlaces::start(400, r#"{"error":{"code":400}}"#).await;
		let app = TestApp::new(PlacesConfig {
			api_key: Some("secret".into()),
			base_url: upstream.base_url.clone(),
			..Default::default()
		});

		let (status, body) = app
			.send(Method::GET, "/placesNearby?lat=47&lng=8&radius=abc&type=spaceship", None)
			.await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body, json!({"error": {"code": 400}}));

		let requests = upstream.requests();
		let sent = &requests[0].body;
		assert_eq!(sent["locationRestriction"]["circle"]["radius"], json!(2000.0));
		assert_eq!(sent["includedTypes"], json!(["tourist_attraction"]));
	}

	#[tokio::test]
	async fn unreachable_upstream_is_proxy_error() {
		let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
		let app = TestApp::new(PlacesConfig {
			api_key: Some("secret".into()),
			base_url: format!("http://127.0.0.1:{port}"),
			..Default::default()
		});

		let (status, body) = app.send(Method::GET, "/placesSearchText?query=Bern", None).await;
		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert!(body["proxyError"].is_string());
	}

	#[tokio::test]
	async fn repeated_query_keys_keep_the_first_value() {
		let app = TestApp::new(PlacesConfig::default());
		for path in ["/placesNearby?lat=1&lat=2", "/placesSearchText?radius=1&radius=2"] {
			let (status, body) = app.send(Method::GET, path, None).await;
			assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{path}");
			assert_eq!(body, json!({"error": "Server missing MAPS_KEY"}));
		}

		let upstream = MockPlaces::start(200, "{}").await;
		let app = TestApp::new(PlacesConfig {
			api_key: Some("secret".into()),
			base_url: upstream.base_url.clone(),
			..Default::default()
		});
		let (status, _) = app
			.send(Method::GET, "/placesNearby?lat=46.5&lat=2&radius=500&radius=9", None)
			.await;
		assert_eq!(status, StatusCode::OK);

		let requests = upstream.requests();
		let circle = &requests[0].body["locationRestriction"]["circle"];
		assert_eq!(circle["center"]["latitude"], json!(46.5));
		assert_eq!(circle["radius"], json!(500.0));
	}

	#[tokio::test]
	async fn undecodable_path_is_400_json() {
		let app = TestApp::new(PlacesConfig::default());
		for method in [Method::GET, Method::DELETE] {
			let (status, body) = app.send(method, "/api/features/%FF", None).await;
			assert_eq!(status, StatusCode::BAD_REQUEST);
			assert!(body["error"].is_string());
		}
	}
}
