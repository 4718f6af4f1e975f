use serde::Deserialize;

pub const DEFAULT_IP: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
	/// IP to bind to. Default: 0.0.0.0
	#[serde()]
	pub ip: Option<String>,

	/// TCP port to bind to. Default: 8787
	#[serde()]
	pub port: Option<u16>,

	/// Maximum size of a JSON request body. Default: 5 MiB
	#[serde()]
	pub body_limit_bytes: Option<usize>,
}

impl ServerConfig {
	pub fn override_optional_ip(&mut self, ip: &Option<String>) {
		if ip.is_some() {
			self.ip = ip.clone();
		}
	}
	pub fn override_optional_port(&mut self, port: &Option<u16>) {
		if port.is_some() {
			self.port = *port;
		}
	}

	pub fn ip(&self) -> &str {
		self.ip.as_deref().unwrap_or(DEFAULT_IP)
	}
	pub fn port(&self) -> u16 {
		self.port.unwrap_or(DEFAULT_PORT)
	}
	pub fn body_limit_bytes(&self) -> usize {
		self.body_limit_bytes.unwrap_or(DEFAULT_BODY_LIMIT_BYTES)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_apply_when_unset() {
		let cfg = ServerConfig::default();
		assert_eq!(cfg.ip(), "0.0.0.0");
		assert_eq!(cfg.port(), 8787);
		assert_eq!(cfg.body_limit_bytes(), 5_242_880);
	}

	#[test]
	fn overrides_only_replace_present_values() {
		let mut cfg = ServerConfig {
			ip: Some("127.0.0.1".into()),
			port: Some(1234),
			body_limit_bytes: None,
		};
		cfg.override_optional_ip(&None);
		cfg.override_optional_port(&Some(4321));
		assert_eq!(cfg.ip(), "127.0.0.1");
		assert_eq!(cfg.port(), 4321);
	}
}
