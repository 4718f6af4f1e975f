//! SwissMap server configuration.
//!
//! - [`Config`](crate::config::Config): top-level loader and YAML parser
//! - [`ServerConfig`](crate::config::ServerConfig): network settings and request limits
//! - [`CorsConfig`](crate::config::CorsConfig): CORS policy
//! - [`PlacesConfig`](crate::config::PlacesConfig): places-search relay constants and API key
//! - [`StorageConfig`](crate::config::StorageConfig): feature store selection
//!
//! A config file is optional. Command line flags and environment variables are applied on top
//! of it by the CLI.

mod cors;
mod main;
mod places;
mod server;
mod storage;

pub use cors::CorsConfig;
pub use main::Config;
pub use places::PlacesConfig;
pub use server::ServerConfig;
pub use storage::{StorageBackendKind, StorageConfig};
