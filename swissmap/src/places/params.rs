//! Query parameters for the two search shapes, and the upstream request bodies built from them.
//!
//! Parameters arrive as raw strings so that garbage never turns into a client error:
//! coordinates that do not parse become `0`, radii that do not parse get the default and are
//! then clamped, and disallowed place types fall back to the default type. A key given more than
//! once keeps its first value.

use crate::config::PlacesConfig;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
pub struct NearbyParams {
	pub lat: Option<String>,
	pub lng: Option<String>,
	pub radius: Option<String>,
	#[serde(rename = "type")]
	pub kind: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
pub struct TextParams {
	pub query: Option<String>,
	pub lat: Option<String>,
	pub lng: Option<String>,
	pub radius: Option<String>,
}

/// Builds parameters from decoded query pairs, keeping the first value of repeated keys.
pub fn from_query_pairs<T: DeserializeOwned>(pairs: Vec<(String, String)>) -> Result<T, serde_json::Error> {
	let mut map = Map::new();
	for (key, value) in pairs {
		map.entry(key).or_insert(Value::String(value));
	}
	serde_json::from_value(Value::Object(map))
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
	raw.and_then(|s| s.trim().parse::<f64>().ok()).filter(|v| v.is_finite())
}

/// Parses a coordinate in degrees. Missing or invalid values become `0`.
pub fn parse_coordinate(raw: Option<&str>) -> f64 {
	parse_number(raw).unwrap_or(0.0)
}

/// Parses a radius in meters, substituting `default` for missing or invalid values and clamping
/// the result to `[min_radius, max_radius]`.
pub fn resolve_radius(raw: Option<&str>, default: f64, config: &PlacesConfig) -> f64 {
	parse_number(raw)
		.unwrap_or(default)
		.clamp(config.min_radius, config.max_radius)
}

/// Restricts a requested place type to the allow-list. `None` means "no type filter".
pub fn resolve_type(raw: Option<&str>, config: &PlacesConfig) -> Option<String> {
	let requested = raw.map(str::trim).filter(|t| !t.is_empty())?;
	if config.allowed_types.iter().any(|t| t == requested) {
		Some(requested.to_owned())
	} else {
		log::debug!("place type '{requested}' not allowed, using '{}'", config.default_type);
		Some(config.default_type.clone())
	}
}

fn circle(lat: Option<&str>, lng: Option<&str>, radius: f64) -> Value {
	json!({
		"circle": {
			"center": {
				"latitude": parse_coordinate(lat),
				"longitude": parse_coordinate(lng),
			},
			"radius": radius,
		}
	})
}

impl NearbyParams {
	/// Body for `places:searchNearby`.
	pub fn to_body(&self, config: &PlacesConfig) -> Value {
		let radius = resolve_radius(self.radius.as_deref(), config.nearby_default_radius, config);
		let mut body = json!({
			"maxResultCount": config.max_result_count,
			"locationRestriction": circle(self.lat.as_deref(), self.lng.as_deref(), radius),
		});
		if let Some(kind) = resolve_type(self.kind.as_deref(), config) {
			body["includedTypes"] = json!([kind]);
		}
		body
	}
}

impl TextParams {
	/// Body for `places:searchText`.
	pub fn to_body(&self, config: &PlacesConfig) -> Value {
		let radius = resolve_radius(self.radius.as_deref(), config.text_default_radius, config);
		let query = self
			.query
			.as_deref()
			.map(str::trim)
			.filter(|q| !q.is_empty())
			.unwrap_or(config.placeholder_query.as_str());
		json!({
			"textQuery": query,
			"maxResultCount": config.max_result_count,
			"locationBias": circle(self.lat.as_deref(), self.lng.as_deref(), radius),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	#[rstest]
	#[case(Some("-5"), 100.0)]
	#[case(Some("0"), 100.0)]
	#[case(Some("999999"), 50_000.0)]
	#[case(Some("1500"), 1_500.0)]
	#[case(Some(" 750.5 "), 750.5)]
	#[case(Some("abc"), 2_000.0)]
	#[case(Some(""), 2_000.0)]
	#[case(Some("NaN"), 2_000.0)]
	#[case(Some("inf"), 2_000.0)]
	#[case(None, 2_000.0)]
	fn radius_is_defaulted_and_clamped(#[case] raw: Option<&str>, #[case] expected: f64) {
		let config = PlacesConfig::default();
		assert_eq!(resolve_radius(raw, 2_000.0, &config), expected);
	}

	#[test]
	fn repeated_keys_keep_the_first_value() {
		let pairs = vec![
			("lat".to_owned(), "1".to_owned()),
			("lat".to_owned(), "2".to_owned()),
			("type".to_owned(), "lodging".to_owned()),
			("unknown".to_owned(), "x".to_owned()),
		];
		let params: NearbyParams = from_query_pairs(pairs).unwrap();
		assert_eq!(
			params,
			NearbyParams {
				lat: Some("1".into()),
				kind: Some("lodging".into()),
				..Default::default()
			}
		);
	}

	#[test]
	fn radius_bounds_are_configurable() {
		let config = PlacesConfig {
			min_radius: 1.0,
			max_radius: 10.0,
			..Default::default()
		};
		assert_eq!(resolve_radius(Some("-5"), 5.0, &config), 1.0);
		assert_eq!(resolve_radius(Some("20"), 5.0, &config), 10.0);
	}

	#[rstest]
	#[case(Some("46.8"), 46.8)]
	#[case(Some("-8.25"), -8.25)]
	#[case(Some("north"), 0.0)]
	#[case(None, 0.0)]
	fn coordinates_coerce_to_zero(#[case] raw: Option<&str>, #[case] expected: f64) {
		assert_eq!(parse_coordinate(raw), expected);
	}

	#[rstest]
	#[case(Some("restaurant"), Some("restaurant"))]
	#[case(Some("lodging"), Some("lodging"))]
	#[case(Some("spaceship"), Some("tourist_attraction"))]
	#[case(Some(""), None)]
	#[case(None, None)]
	fn type_allow_list(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
		let config = PlacesConfig::default();
		assert_eq!(resolve_type(raw, &config).as_deref(), expected);
	}

	#[test]
	fn nearby_body() {
		let params = NearbyParams {
			lat: Some("46.8".into()),
			lng: Some("8.2".into()),
			radius: Some("999999".into()),
			kind: Some("spaceship".into()),
		};
		assert_eq!(
			params.to_body(&PlacesConfig::default()),
			json!({
				"maxResultCount": 20,
				"locationRestriction": {"circle": {"center": {"latitude": 46.8, "longitude": 8.2}, "radius": 50000.0}},
				"includedTypes": ["tourist_attraction"],
			})
		);
	}

	#[test]
	fn nearby_body_without_type() {
		let body = NearbyParams::default().to_body(&PlacesConfig::default());
		assert!(body.get("includedTypes").is_none());
		assert_eq!(body["locationRestriction"]["circle"]["radius"], json!(2000.0));
	}

	#[test]
	fn text_body_uses_placeholder_for_empty_query() {
		let params = TextParams {
			query: Some("   ".into()),
			lat: Some("47.37".into()),
			lng: Some("8.54".into()),
			radius: None,
		};
		assert_eq!(
			params.to_body(&PlacesConfig::default()),
			json!({
				"textQuery": "tourist attraction",
				"maxResultCount": 20,
				"locationBias": {"circle": {"center": {"latitude": 47.37, "longitude": 8.54}, "radius": 30000.0}},
			})
		);
	}

	#[test]
	fn text_body_keeps_query() {
		let params = TextParams {
			query: Some("Matterhorn".into()),
			..Default::default()
		};
		assert_eq!(params.to_body(&PlacesConfig::default())["textQuery"], json!("Matterhorn"));
	}
}
