use std::env;
use std::path::PathBuf;

/// Server configuration from environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
	/// Folder holding `styles.json` and the `.dat` category files.
	pub data_dir: PathBuf,
	/// Initial seed, a time-based one when unset.
	pub seed: Option<u64>,
	/// Largest `count` accepted by a single request.
	pub max_count: usize,
}

impl ServerConfig {
	pub fn from_env() -> Self {
		Self::from_lookup(|key| env::var(key).ok())
	}

	fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
		Self {
			host: lookup("PROMPT_CRAFTER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
			port: lookup("PROMPT_CRAFTER_PORT")
				.and_then(|p| p.parse().ok())
				.unwrap_or(5000),
			data_dir: lookup("PROMPT_CRAFTER_DATA")
				.map(PathBuf::from)
				.unwrap_or_else(|| PathBuf::from("./data")),
			seed: lookup("PROMPT_CRAFTER_SEED").and_then(|s| s.parse().ok()),
			max_count: lookup("PROMPT_CRAFTER_MAX_COUNT")
				.and_then(|c| c.parse().ok())
				.unwrap_or(1000),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	#[test]
	fn defaults_apply_when_unset_or_invalid() {
		let vars: HashMap<&str, &str> = HashMap::from([("PROMPT_CRAFTER_PORT", "not-a-port")]);
		let config = ServerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
		assert_eq!(config.host, "127.0.0.1");
		assert_eq!(config.port, 5000);
		assert_eq!(config.data_dir, PathBuf::from("./data"));
		assert_eq!(config.seed, None);
		assert_eq!(config.max_count, 1000);
	}

	#[test]
	fn reads_every_variable() {
		let vars: HashMap<&str, &str> = HashMap::from([
			("PROMPT_CRAFTER_HOST", "0.0.0.0"),
			("PROMPT_CRAFTER_PORT", "8080"),
			("PROMPT_CRAFTER_DATA", "/srv/prompts"),
			("PROMPT_CRAFTER_SEED", "42"),
			("PROMPT_CRAFTER_MAX_COUNT", "10"),
		]);
		let config = ServerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
		assert_eq!(config.host, "0.0.0.0");
		assert_eq!(config.port, 8080);
		assert_eq!(config.data_dir, PathBuf::from("/srv/prompts"));
		assert_eq!(config.seed, Some(42));
		assert_eq!(config.max_count, 10);
	}
}
