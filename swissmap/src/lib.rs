//! # SwissMap
//!
//! Backend for a map client: relays place searches to the Google Places API without exposing
//! the key, and serves a CRUD API over map features kept in Firestore or a local JSON file.
//!
//! - [`config`]: YAML configuration with CLI/environment overrides
//! - [`places`]: parameter clamping and the outbound relay
//! - [`store`]: start-up selection of the feature store
//! - [`server`]: router, handlers, CORS and server lifecycle
//!
//! ```rust,no_run
//! use swissmap::{config::Config, server::SwissMapServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = SwissMapServer::from_config(&Config::default()).await?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod places;
pub mod server;
pub mod store;
