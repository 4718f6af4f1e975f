use super::{CorsConfig, PlacesConfig, ServerConfig, StorageConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// HTTP server configuration
	#[serde(default)]
	pub server: ServerConfig,

	/// Cross-Origin Resource Sharing (CORS) settings
	#[serde(default)]
	pub cors: CorsConfig,

	/// Places-search relay settings
	#[serde(default)]
	pub places: PlacesConfig,

	/// Feature store settings
	#[serde(default)]
	pub storage: StorageConfig,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		let cfg: Config = serde_yaml_ng::from_reader(reader)?;
		cfg.places.validate()?;
		Ok(cfg)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		// serde_yaml_ng treats an empty document as null
		if text.trim().is_empty() {
			return Ok(Config::default());
		}
		let cfg: Config = serde_yaml_ng::from_str(text)?;
		cfg.places.validate()?;
		Ok(cfg)
	}

	/// Parse from a file path. A relative `storage.data_file` is resolved against the file's directory.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config file {path:?}"))?;
		let mut cfg = Config::from_reader(BufReader::new(file)).with_context(|| format!("parsing config file {path:?}"))?;

		if let Some(base) = path.parent() {
			cfg.storage.resolve_paths(base);
		}
		Ok(cfg)
	}
}
