use super::config_args::ConfigArgs;
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::path::PathBuf;
use swissmap::store::open_store;
use swissmap_core::FeaturePatch;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	#[command(subcommand)]
	action: Action,
}

#[derive(clap::Subcommand, Debug)]
enum Action {
	/// Print all stored features as JSON
	List {
		#[command(flatten)]
		config: ConfigArgs,
	},

	/// Import features from a JSON file and print their ids
	#[command(verbatim_doc_comment)]
	Import {
		/// JSON file holding an array of features, a {"features": [...]} collection or a single feature.
		#[arg(required = true)]
		file: PathBuf,

		#[command(flatten)]
		config: ConfigArgs,
	},
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	match &arguments.action {
		Action::List { config } => {
			let store = open_store(&config.load()?.storage).await;
			let features = store.list().await?;
			log::info!("{} features in {} store", features.len(), store.backend());
			println!("{}", serde_json::to_string_pretty(&features)?);
		}
		Action::Import { file, config } => {
			let text = std::fs::read_to_string(file).with_context(|| format!("reading {file:?}"))?;
			let patches = parse_import(&text).with_context(|| format!("parsing {file:?}"))?;

			let store = open_store(&config.load()?.storage).await;
			let ids = store.upsert_many(patches).await?;
			log::info!("imported {} features into {} store", ids.len(), store.backend());
			for id in ids {
				println!("{id}");
			}
		}
	}
	Ok(())
}

/// Accepts an array of features, a `{"features": [...]}` collection or a single feature object.
fn parse_import(text: &str) -> Result<Vec<FeaturePatch>> {
	let items = match serde_json::from_str::<Value>(text)? {
		Value::Array(items) => items,
		Value::Object(mut object) => match object.remove("features") {
			Some(Value::Array(items)) => items,
			Some(_) => bail!("\"features\" must be an array"),
			None => vec![Value::Object(object)],
		},
		_ => bail!("expected a JSON array or object"),
	};

	items
		.into_iter()
		.enumerate()
		.map(|(index, item)| {
			if !item.is_object() {
				bail!("item {index} is not an object");
			}
			serde_json::from_value(item).with_context(|| format!("item {index} is not a valid feature"))
		})
		.collect()
}
