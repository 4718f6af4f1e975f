use anyhow::Result;
use std::path::PathBuf;
use swissmap::config::Config;

/// Configuration sources shared by all subcommands.
///
/// Precedence, lowest first: built-in defaults, the YAML file, environment variables, flags.
#[derive(clap::Args, Debug, Default)]
pub struct ConfigArgs {
	/// Path to a YAML configuration file (server, cors, places and storage settings).
	/// Command line arguments and environment variables override configuration file settings.
	#[arg(short = 'c', long, value_name = "FILE", display_order = 0, verbatim_doc_comment)]
	pub config: Option<PathBuf>,

	/// API key for the places service.
	#[arg(long, env = "MAPS_KEY", hide_env_values = true, display_order = 2)]
	pub maps_key: Option<String>,

	/// Store features in Firestore instead of a local JSON file.
	#[arg(
		long,
		env = "USE_FIRESTORE",
		action = clap::ArgAction::SetTrue,
		value_parser = clap::builder::FalseyValueParser::new(),
		display_order = 3
	)]
	pub use_firestore: bool,

	/// Firestore collection holding the features. Default: features
	#[arg(long, env = "FEATURES_COLLECTION", display_order = 3)]
	pub collection: Option<String>,

	/// Firestore project id. Default: the project of the credentials
	#[arg(long, env = "FIRESTORE_PROJECT_ID", display_order = 3)]
	pub project_id: Option<String>,

	/// Inline service-account JSON. Default: ambient Google credentials
	#[arg(long, env = "SERVICE_ACCOUNT_JSON", hide_env_values = true, display_order = 3)]
	pub service_account_json: Option<String>,

	/// JSON file of the local feature store. Default: data/features.json
	#[arg(long, env = "DATA_FILE", value_name = "FILE", display_order = 3)]
	pub data_file: Option<PathBuf>,
}

impl ConfigArgs {
	/// Loads the configuration file (if any) and applies all overrides.
	pub fn load(&self) -> Result<Config> {
		let mut config = match &self.config {
			Some(path) => Config::from_path(path)?,
			None => Config::default(),
		};

		config.places.override_optional_api_key(&self.maps_key);
		config.storage.override_use_firestore(self.use_firestore);
		config.storage.override_optional_collection(&self.collection);
		config.storage.override_optional_project_id(&self.project_id);
		config.storage.override_optional_service_account_json(&self.service_account_json);
		config.storage.override_optional_data_file(&self.data_file);

		Ok(config)
	}
}
