//! Conversion between plain JSON and Firestore's typed `Value` representation.
//!
//! Firestore REST documents wrap every value in a single-key object such as
//! `{"stringValue": "x"}` or `{"mapValue": {"fields": {...}}}`. Integers travel as decimal strings.

use crate::{Feature, FeaturePatch, StoreError};
use serde_json::{Map, Value, json};

/// Wraps a JSON value into a Firestore `Value`.
pub fn encode_value(value: &Value) -> Value {
	match value {
		Value::Null => json!({ "nullValue": null }),
		Value::Bool(b) => json!({ "booleanValue": b }),
		Value::Number(n) => match n.as_i64() {
			Some(i) => json!({ "integerValue": i.to_string() }),
			None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
		},
		Value::String(s) => json!({ "stringValue": s }),
		Value::Array(items) => {
			json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } })
		}
		Value::Object(map) => json!({ "mapValue": { "fields": encode_map(map) } }),
	}
}

pub fn encode_map(map: &Map<String, Value>) -> Map<String, Value> {
	map.iter().map(|(k, v)| (k.clone(), encode_value(v))).collect()
}

/// Unwraps a Firestore `Value` into plain JSON.
///
/// Timestamps, references and bytes become strings; geo points become `{latitude, longitude}`.
pub fn decode_value(value: &Value) -> Result<Value, StoreError> {
	let object = value
		.as_object()
		.ok_or_else(|| StoreError::Decode(format!("expected a typed value, found {value}")))?;

	let (kind, inner) = object
		.iter()
		.next()
		.ok_or_else(|| StoreError::Decode("empty typed value".into()))?;

	Ok(match kind.as_str() {
		"nullValue" => Value::Null,
		"booleanValue" => Value::Bool(inner.as_bool().unwrap_or(false)),
		"integerValue" => {
			let text = inner.as_str().map(str::to_owned).unwrap_or_else(|| inner.to_string());
			let number: i64 = text
				.parse()
				.map_err(|_| StoreError::Decode(format!("invalid integerValue '{text}'")))?;
			Value::from(number)
		}
		"doubleValue" => inner
			.as_f64()
			.and_then(serde_json::Number::from_f64)
			.map_or(Value::Null, Value::Number),
		"stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
		"geoPointValue" => json!({
			"latitude": inner.get("latitude").cloned().unwrap_or(json!(0.0)),
			"longitude": inner.get("longitude").cloned().unwrap_or(json!(0.0)),
		}),
		"arrayValue" => Value::Array(
			inner
				.get("values")
				.and_then(Value::as_array)
				.map(|values| values.iter().map(decode_value).collect::<Result<Vec<_>, _>>())
				.transpose()?
				.unwrap_or_default(),
		),
		"mapValue" => Value::Object(decode_fields(inner.get("fields"))?),
		other => return Err(StoreError::Decode(format!("unsupported value type '{other}'"))),
	})
}

fn decode_fields(fields: Option<&Value>) -> Result<Map<String, Value>, StoreError> {
	match fields.and_then(Value::as_object) {
		Some(fields) => fields
			.iter()
			.map(|(k, v)| Ok((k.clone(), decode_value(v)?)))
			.collect(),
		None => Ok(Map::new()),
	}
}

/// Encodes the fields a patch writes, plus the `id` field.
pub fn encode_patch(id: &str, patch: &FeaturePatch) -> Map<String, Value> {
	let mut fields = Map::new();
	fields.insert("id".into(), encode_value(&Value::from(id)));
	if let Some(kind) = &patch.kind {
		fields.insert("type".into(), encode_value(&Value::from(kind.as_str())));
	}
	if let Some(geometry) = &patch.geometry {
		fields.insert("geometry".into(), encode_value(geometry));
	}
	if let Some(properties) = &patch.properties {
		fields.insert("properties".into(), json!({ "mapValue": { "fields": encode_map(properties) } }));
	}
	fields
}

/// Decodes a REST document (`{name, fields, ...}`) into a feature.
///
/// The id is the last segment of the document name. Missing fields get their defaults.
pub fn decode_document(document: &Value) -> Result<Feature, StoreError> {
	let name = document
		.get("name")
		.and_then(Value::as_str)
		.ok_or_else(|| StoreError::Decode("document without name".into()))?;
	let id = name.rsplit('/').next().unwrap_or(name);

	let mut fields = decode_fields(document.get("fields"))?;
	let mut feature = Feature::empty(id);

	if let Some(Value::String(kind)) = fields.remove("type") {
		feature.kind = kind;
	}
	if let Some(geometry) = fields.remove("geometry") {
		feature.geometry = geometry;
	}
	if let Some(Value::Object(properties)) = fields.remove("properties") {
		feature.properties = properties;
	}

	Ok(feature)
}
