//! Settings for the places-search relay.
//!
//! Every constant the relay applies to outgoing requests lives here with its default, so
//! deployments can tune radius bounds or the result cap without code changes.
//!
//! # Example YAML
//! ```yaml
//! places:
//!   api_key: "..."
//!   min_radius: 1
//!   max_result_count: 50
//! ```
use anyhow::{Result, bail};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/v1";
pub const DEFAULT_FIELD_MASK: &str = "places.id,places.displayName,places.location,places.primaryType";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PlacesConfig {
	/// API key sent upstream as `X-Goog-Api-Key`. Never returned to clients.
	pub api_key: Option<String>,

	/// Base URL of the places API.
	pub base_url: String,

	/// Lower radius bound in meters.
	pub min_radius: f64,

	/// Upper radius bound in meters.
	pub max_radius: f64,

	/// Radius used by nearby search when none (or garbage) is supplied.
	pub nearby_default_radius: f64,

	/// Radius used by text search when none (or garbage) is supplied.
	pub text_default_radius: f64,

	/// `maxResultCount` sent upstream.
	pub max_result_count: u32,

	/// `X-Goog-FieldMask` sent upstream.
	pub field_mask: String,

	/// Place type used when the requested one is not allowed.
	pub default_type: String,

	/// Place types clients may ask for.
	pub allowed_types: Vec<String>,

	/// Text query used when the client sends an empty one.
	pub placeholder_query: String,
}

impl Default for PlacesConfig {
	fn default() -> Self {
		PlacesConfig {
			api_key: None,
			base_url: DEFAULT_BASE_URL.to_owned(),
			min_radius: 100.0,
			max_radius: 50_000.0,
			nearby_default_radius: 2_000.0,
			text_default_radius: 30_000.0,
			max_result_count: 20,
			field_mask: DEFAULT_FIELD_MASK.to_owned(),
			default_type: "tourist_attraction".to_owned(),
			allowed_types: vec![
				"restaurant".to_owned(),
				"lodging".to_owned(),
				"tourist_attraction".to_owned(),
			],
			placeholder_query: "tourist attraction".to_owned(),
		}
	}
}

impl PlacesConfig {
	pub fn override_optional_api_key(&mut self, api_key: &Option<String>) {
		if let Some(key) = api_key.as_ref().filter(|k| !k.is_empty()) {
			self.api_key = Some(key.clone());
		}
	}

	/// The configured key, if it is non-empty.
	pub fn api_key(&self) -> Option<&str> {
		self.api_key.as_deref().filter(|k| !k.is_empty())
	}

	pub fn has_key(&self) -> bool {
		self.api_key().is_some()
	}

	/// Radii must be finite and `0 <= min_radius <= max_radius`.
	pub fn validate(&self) -> Result<()> {
		for (name, value) in [
			("min_radius", self.min_radius),
			("max_radius", self.max_radius),
			("nearby_default_radius", self.nearby_default_radius),
			("text_default_radius", self.text_default_radius),
		] {
			if !value.is_finite() {
				bail!("places.{name} must be a finite number, got {value}");
			}
		}
		if self.min_radius < 0.0 || self.min_radius > self.max_radius {
			bail!(
				"places radius bounds must satisfy 0 <= min_radius <= max_radius, got {} and {}",
				self.min_radius,
				self.max_radius
			);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn empty_key_counts_as_missing() {
		let mut cfg = PlacesConfig {
			api_key: Some(String::new()),
			..Default::default()
		};
		assert!(!cfg.has_key());

		cfg.override_optional_api_key(&Some(String::new()));
		assert!(!cfg.has_key());

		cfg.override_optional_api_key(&Some("k".into()));
		assert_eq!(cfg.api_key(), Some("k"));
	}

	#[rstest]
	#[case(f64::NAN, 50_000.0, 2_000.0)]
	#[case(100.0, f64::INFINITY, 2_000.0)]
	#[case(100.0, 50_000.0, f64::NAN)]
	#[case(-1.0, 50_000.0, 2_000.0)]
	#[case(500.0, 100.0, 2_000.0)]
	fn invalid_radii_are_rejected(#[case] min_radius: f64, #[case] max_radius: f64, #[case] nearby_default_radius: f64) {
		let cfg = PlacesConfig {
			min_radius,
			max_radius,
			nearby_default_radius,
			..Default::default()
		};
		assert!(cfg.validate().is_err());
	}

	#[test]
	fn defaults() {
		let cfg = PlacesConfig::default();
		assert_eq!(cfg.base_url, "https://places.googleapis.com/v1");
		assert_eq!((cfg.min_radius, cfg.max_radius), (100.0, 50_000.0));
		assert_eq!(cfg.max_result_count, 20);
		assert_eq!(cfg.allowed_types.len(), 3);
		cfg.validate().unwrap();
	}
}
