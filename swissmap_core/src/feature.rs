//! The `Feature` record and the partial `FeaturePatch` used to write it.
//!
//! Stores treat `type`, `geometry` and `properties` as opaque values. A write only touches the
//! top-level fields present in the patch; a supplied `properties` object replaces the stored one
//! as a whole.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored geographic record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
	pub id: String,

	#[serde(rename = "type", default)]
	pub kind: String,

	#[serde(default)]
	pub geometry: Value,

	#[serde(default)]
	pub properties: Map<String, Value>,
}

/// The write payload for a feature. Every field is optional.
///
/// Unknown fields in incoming JSON are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturePatch {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,

	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub geometry: Option<Value>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub properties: Option<Map<String, Value>>,
}

/// Generates a new feature id of the form `f_<32 hex digits>`.
pub fn generate_id() -> String {
	format!("f_{}", Uuid::new_v4().simple())
}

impl Feature {
	/// Creates an empty feature with the given id.
	pub fn empty(id: &str) -> Self {
		Feature {
			id: id.to_owned(),
			kind: String::new(),
			geometry: Value::Null,
			properties: Map::new(),
		}
	}

	/// Builds a new feature from a patch. Missing fields get their defaults.
	pub fn from_patch(id: &str, patch: FeaturePatch) -> Self {
		let mut feature = Feature::empty(id);
		feature.merge(patch);
		feature
	}

	/// Sets every field that is present in `patch`. The id is never changed.
	pub fn merge(&mut self, patch: FeaturePatch) {
		if let Some(kind) = patch.kind {
			self.kind = kind;
		}
		if let Some(geometry) = patch.geometry {
			self.geometry = geometry;
		}
		if let Some(properties) = patch.properties {
			self.properties = properties;
		}
	}
}

impl FeaturePatch {
	/// Starts a patch that sets only the `type` tag.
	pub fn new(kind: &str) -> Self {
		FeaturePatch {
			kind: Some(kind.to_owned()),
			..Default::default()
		}
	}

	pub fn with_id(mut self, id: &str) -> Self {
		self.id = Some(id.to_owned());
		self
	}

	pub fn with_geometry(mut self, geometry: Value) -> Self {
		self.geometry = Some(geometry);
		self
	}

	pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.properties.get_or_insert_with(Map::new).insert(key.to_owned(), value.into());
		self
	}

	/// Returns the supplied id, or a freshly generated one if the id is missing or empty.
	pub fn id_or_generate(&self) -> String {
		match self.id.as_deref() {
			Some(id) if !id.is_empty() => id.to_owned(),
			_ => generate_id(),
		}
	}

	/// Names of the top-level fields this patch writes, in a stable order.
	pub fn field_names(&self) -> Vec<&'static str> {
		let mut names = Vec::with_capacity(3);
		if self.kind.is_some() {
			names.push("type");
		}
		if self.geometry.is_some() {
			names.push("geometry");
		}
		if self.properties.is_some() {
			names.push("properties");
		}
		names
	}
}
