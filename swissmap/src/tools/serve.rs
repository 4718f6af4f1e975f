use super::config_args::ConfigArgs;
use anyhow::Result;
use swissmap::server::SwissMapServer;
use tokio::time::{Duration, sleep};

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true, verbatim_doc_comment)]
pub struct Subcommand {
	#[command(flatten)]
	pub config: ConfigArgs,

	/// Serve via socket ip. Default: 0.0.0.0
	#[arg(short = 'i', long, display_order = 0)]
	pub ip: Option<String>,

	/// Serve via port. Default: 8787
	#[arg(short, long, env = "PORT", display_order = 0)]
	pub port: Option<u16>,

	/// Shutdown server automatically after x milliseconds.
	#[arg(long, display_order = 4)]
	pub auto_shutdown: Option<u64>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let mut config = arguments.config.load()?;
	config.server.override_optional_ip(&arguments.ip);
	config.server.override_optional_port(&arguments.port);

	let mut server = SwissMapServer::from_config(&config).await?;
	server.start().await?;
	eprintln!("server listening on {}:{}", config.server.ip(), server.port());

	if let Some(milliseconds) = arguments.auto_shutdown {
		sleep(Duration::from_millis(milliseconds)).await;
	} else {
		loop {
			sleep(Duration::from_secs(60)).await;
		}
	}

	server.stop().await;
	Ok(())
}
