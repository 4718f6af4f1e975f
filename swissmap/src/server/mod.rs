//! HTTP server exposing the places relay and the feature API.

mod cors;
mod handlers;
mod response;
mod routes;
mod swissmap_server;

pub use handlers::AppState;
pub use response::ApiError;
pub use routes::build_router;
pub use swissmap_server::SwissMapServer;
