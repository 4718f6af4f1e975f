//! Server lifecycle and middleware composition.
//!
//! Request handling lives in `handlers`, path wiring in `routes`, origin checks in `cors`.
//! This type owns the remaining concerns: building the shared state, applying the global
//! layers (body limit, CORS, panic catching), binding the socket and graceful shutdown.

use super::{
	cors,
	handlers::AppState,
	response::ApiError,
	routes,
};
use crate::{config::Config, places::PlacesRelay, store::open_store};
use anyhow::{Context, Result};
use axum::{Router, extract::DefaultBodyLimit, response::IntoResponse};
use std::{any::Any, sync::Arc};
use swissmap_core::store::FeatureStoreArc;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tower_http::catch_panic::CatchPanicLayer;

/// HTTP server for the places relay and the feature API.
///
/// `start` is idempotent (a running instance is stopped first) and `stop` is a no-op when the
/// server is not running.
pub struct SwissMapServer {
	ip: String,
	port: u16,
	body_limit_bytes: usize,
	cors_allowed_origins: Vec<String>,
	cors_max_age_seconds: u64,
	state: AppState,
	exit_signal: Option<oneshot::Sender<()>>,
	join: Option<JoinHandle<()>>,
}

impl SwissMapServer {
	/// Builds a server around an already opened store.
	pub fn new(config: &Config, store: FeatureStoreArc) -> Result<SwissMapServer> {
		config.places.validate()?;
		let relay = PlacesRelay::new(config.places.clone()).context("creating places client")?;
		Ok(SwissMapServer {
			ip: config.server.ip().to_owned(),
			port: config.server.port(),
			body_limit_bytes: config.server.body_limit_bytes(),
			cors_allowed_origins: config.cors.allowed_origins.clone(),
			cors_max_age_seconds: config.cors.max_age_seconds(),
			state: AppState {
				store,
				relay: Arc::new(relay),
			},
			exit_signal: None,
			join: None,
		})
	}

	/// Opens the configured store (falling back to the local file) and builds the server.
	pub async fn from_config(config: &Config) -> Result<SwissMapServer> {
		let store = open_store(&config.storage).await;
		SwissMapServer::new(config, store)
	}

	/// The port the server listens on. After `start` with port `0` this is the assigned port.
	pub fn port(&self) -> u16 {
		self.port
	}

	/// The complete application: routes plus global layers.
	pub fn router(&self) -> Result<Router> {
		let cors_layer = cors::build_cors_layer(&self.cors_allowed_origins, self.cors_max_age_seconds)?;

		Ok(routes::build_router(self.state.clone())
			.layer(DefaultBodyLimit::max(self.body_limit_bytes))
			.layer(cors_layer)
			.layer(CatchPanicLayer::custom(panic_response)))
	}

	pub async fn start(&mut self) -> Result<()> {
		if self.exit_signal.is_some() || self.join.is_some() {
			self.stop().await;
		}

		let router = self.router()?;

		let addr = format!("{}:{}", self.ip, self.port);
		let listener = TcpListener::bind(&addr)
			.await
			.with_context(|| format!("binding {addr}"))?;
		self.port = listener.local_addr()?.port();

		log::info!(
			"listening on {}:{} (backend: {}, places key: {})",
			self.ip,
			self.port,
			self.state.store.backend(),
			if self.state.relay.has_key() { "****" } else { "missing" }
		);

		let (tx, rx) = oneshot::channel::<()>();
		let handle = tokio::spawn(async move {
			if let Err(err) = axum::serve(listener, router.into_make_service())
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await
			{
				log::error!("server task exited with error: {err}");
			}
		});

		self.exit_signal = Some(tx);
		self.join = Some(handle);

		Ok(())
	}

	/// Triggers graceful shutdown and waits (up to 10 seconds) for in-flight requests.
	pub async fn stop(&mut self) {
		if self.exit_signal.is_none() && self.join.is_none() {
			return;
		}

		log::info!("stopping server");

		if let Some(tx) = self.exit_signal.take() {
			let _ = tx.send(());
		}

		if let Some(handle) = self.join.take() {
			match tokio::time::timeout(std::time::Duration::from_secs(10), handle).await {
				Ok(Err(join_err)) => log::warn!("server task join error: {join_err}"),
				Ok(Ok(())) => {}
				Err(_) => log::warn!("server task did not shut down within timeout; continuing"),
			}
		}
	}
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> axum::response::Response {
	let message = err
		.downcast_ref::<String>()
		.map(String::as_str)
		.or_else(|| err.downcast_ref::<&str>().copied())
		.unwrap_or("unknown panic");
	log::error!("handler panicked: {message}");
	ApiError::Internal("internal server error".to_owned()).into_response()
}
