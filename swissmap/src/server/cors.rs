//! CORS layer for the browser map client.
//!
//! Supports the following `allowed_origins` patterns (strings):
//! - `"*"`                     → allow all origins
//! - `"*.example.com"`        → suffix match
//! - `"https://example.com*"` → prefix match
//! - `"/^https://(foo|bar)\.example\.com$/"` → custom regex (leading and trailing `/`)
//! - exact strings like `"https://maps.example.org"`
//!
//! The client reads, creates, updates and deletes features, so GET, POST, PUT, DELETE and
//! OPTIONS are allowed together with any request header.

use anyhow::{Context, Result};
use axum::http::{Method, header::HeaderValue, request::Parts};
use regex::Regex;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync + 'static>;

fn compile(pattern: &str) -> Result<Predicate> {
	let predicate: Predicate = if pattern == "*" {
		Box::new(|_: &str| true)
	} else if let Some(suffix) = pattern.strip_prefix('*').filter(|s| !s.is_empty() && !s.contains('*')) {
		let suffix = suffix.to_owned();
		Box::new(move |origin: &str| origin.ends_with(&suffix))
	} else if let Some(prefix) = pattern.strip_suffix('*').filter(|s| !s.is_empty() && !s.contains('*')) {
		let prefix = prefix.to_owned();
		Box::new(move |origin: &str| origin.starts_with(&prefix))
	} else if pattern.len() > 2 && pattern.starts_with('/') && pattern.ends_with('/') {
		let re = Regex::new(&pattern[1..pattern.len() - 1]).with_context(|| format!("invalid CORS origin regex {pattern}"))?;
		Box::new(move |origin: &str| re.is_match(origin))
	} else {
		let exact = pattern.to_owned();
		Box::new(move |origin: &str| origin == exact)
	};
	Ok(predicate)
}

/// Build a `CorsLayer` whose origin predicate ORs all `allowed_origins` patterns.
pub fn build_cors_layer(allowed_origins: &[String], max_age_seconds: u64) -> Result<CorsLayer> {
	let checks = allowed_origins
		.iter()
		.map(|pattern| compile(pattern))
		.collect::<Result<Vec<_>>>()?;

	Ok(CorsLayer::new()
		.allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _req: &Parts| {
			let origin = origin.to_str().unwrap_or("");
			checks.iter().any(|f| f(origin))
		}))
		.allow_methods(AllowMethods::list([
			Method::GET,
			Method::POST,
			Method::PUT,
			Method::DELETE,
			Method::OPTIONS,
		]))
		.allow_headers(AllowHeaders::any())
		.max_age(Duration::from_secs(max_age_seconds)))
}
