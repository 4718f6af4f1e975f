//! Cross-Origin Resource Sharing (CORS) configuration.
//!
//! The browser map client usually runs on a different origin than this backend, so all origins
//! are allowed by default. The list can be restricted with exact origins, `*suffix`, `prefix*`
//! or `/regex/` patterns.
//!
//! # Example YAML
//! ```yaml
//! cors:
//!   allowed_origins:
//!     - "https://map.example.org"
//!     - "*.example.net"
//!   max_age_seconds: 86400
//! ```
use serde::Deserialize;

pub const DEFAULT_MAX_AGE_SECONDS: u64 = 86400;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
	/// Allowed origins for CORS requests. Defaults to `["*"]`.
	#[serde(default = "default_allowed_origins")]
	pub allowed_origins: Vec<String>,

	/// Optional duration for preflight cache in seconds. Defaults to 86400 (1 day).
	#[serde(default)]
	pub max_age_seconds: Option<u64>,
}

fn default_allowed_origins() -> Vec<String> {
	vec!["*".to_string()]
}

impl CorsConfig {
	pub fn max_age_seconds(&self) -> u64 {
		self.max_age_seconds.unwrap_or(DEFAULT_MAX_AGE_SECONDS)
	}
}

impl Default for CorsConfig {
	fn default() -> Self {
		Self {
			allowed_origins: default_allowed_origins(),
			max_age_seconds: None,
		}
	}
}
