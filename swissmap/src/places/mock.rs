//! In-process stand-in for the places API, recording every request it receives.

use axum::{
	Router,
	body::Bytes,
	extract::State,
	http::{HeaderMap, StatusCode, Uri, header},
	response::{IntoResponse, Response},
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::{net::TcpListener, sync::oneshot};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
	pub path: String,
	pub api_key: Option<String>,
	pub field_mask: Option<String>,
	pub content_type: Option<String>,
	pub body: Value,
}

#[derive(Clone)]
struct MockState {
	status: u16,
	body: &'static str,
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockPlaces {
	pub base_url: String,
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
	shutdown: Option<oneshot::Sender<()>>,
}

impl MockPlaces {
	/// Starts a server answering every request with `status` and `body`.
	pub async fn start(status: u16, body: &'static str) -> MockPlaces {
		let requests = Arc::new(Mutex::new(Vec::new()));
		let state = MockState {
			status,
			body,
			requests: Arc::clone(&requests),
		};
		let app = Router::new().fallback(record).with_state(state);

		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let port = listener.local_addr().unwrap().port();
		let (tx, rx) = oneshot::channel::<()>();
		tokio::spawn(async move {
			axum::serve(listener, app)
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await
				.unwrap();
		});

		MockPlaces {
			base_url: format!("http://127.0.0.1:{port}/v1"),
			requests,
			shutdown: Some(tx),
		}
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().unwrap().clone()
	}
}

impl Drop for MockPlaces {
	fn drop(&mut self) {
		if let Some(tx) = self.shutdown.take() {
			let _ = tx.send(());
		}
	}
}

async fn record(State(state): State<MockState>, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
	let text = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
	state.requests.lock().unwrap().push(RecordedRequest {
		path: uri.path().to_owned(),
		api_key: text("x-goog-api-key"),
		field_mask: text("x-goog-fieldmask"),
		content_type: text("content-type"),
		body: serde_json::from_slice(&body).unwrap_or(Value::Null),
	});

	(
		StatusCode::from_u16(state.status).unwrap(),
		[(header::CONTENT_TYPE, "application/json; charset=UTF-8")],
		state.body,
	)
		.into_response()
}
