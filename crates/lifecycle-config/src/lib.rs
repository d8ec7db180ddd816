//! Configuration module for the marketplace lifecycle system.
//!
//! This module provides structures and utilities for managing lifecycle
//! configuration. It supports loading configuration from TOML files with
//! `${ENV_VAR}` placeholders and validates that all required values are
//! properly set before the lifecycle manager is built.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the lifecycle system.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to the marketplace instance.
	pub marketplace: MarketplaceConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
}

/// Configuration specific to the marketplace instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketplaceConfig {
	/// Unique identifier for this marketplace instance.
	pub id: String,
	/// ISO 4217 code of the currency all monetary amounts are in.
	#[serde(default = "default_currency")]
	pub currency: String,
}

/// Returns the default marketplace currency.
fn default_currency() -> String {
	"EUR".to_string()
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Name of the backend implementation to use, e.g. "memory" or "file".
	pub backend: String,
	/// Backend-specific configuration table, validated against the
	/// backend's own schema when the manager is built.
	#[serde(default = "empty_table")]
	pub config: toml::Value,
}

/// Returns an empty TOML table for backends without configuration.
fn empty_table() -> toml::Value {
	toml::Value::Table(toml::map::Map::new())
}

impl Config {
	/// Loads configuration from a TOML file.
	///
	/// Environment-variable placeholders of the form `${NAME}` are
	/// resolved before parsing so secrets can stay out of the file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path)?;
		let resolved = resolve_env_vars(&content)?;
		resolved.parse()
	}

	/// Validates the configuration values.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.marketplace.id.trim().is_empty() {
			return Err(ConfigError::Validation(
				"marketplace.id must not be empty".into(),
			));
		}
		if self.marketplace.currency.len() != 3 {
			return Err(ConfigError::Validation(
				"marketplace.currency must be a 3-letter ISO code".into(),
			));
		}
		if self.storage.backend.trim().is_empty() {
			return Err(ConfigError::Validation(
				"storage.backend must not be empty".into(),
			));
		}
		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let config: Config = toml::from_str(s)?;
		config.validate()?;
		Ok(config)
	}
}

/// Resolves `${ENV_VAR}` placeholders in the configuration content.
///
/// Fails if a referenced variable is not set, so a missing secret is
/// reported at load time rather than surfacing later as a bad value.
pub fn resolve_env_vars(content: &str) -> Result<String, ConfigError> {
	let pattern = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
		.map_err(|e| ConfigError::Parse(e.to_string()))?;

	let mut resolved = String::with_capacity(content.len());
	let mut last_end = 0;
	for caps in pattern.captures_iter(content) {
		let Some(whole) = caps.get(0) else { continue };
		let name = &caps[1];
		let value = std::env::var(name).map_err(|_| {
			ConfigError::Validation(format!("Environment variable {} is not set", name))
		})?;
		resolved.push_str(&content[last_end..whole.start()]);
		resolved.push_str(&value);
		last_end = whole.end();
	}
	resolved.push_str(&content[last_end..]);
	Ok(resolved)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn parses_minimal_config() {
		let config: Config = r#"
			[marketplace]
			id = "atelier-eu"

			[storage]
			backend = "memory"
		"#
		.parse()
		.unwrap();

		assert_eq!(config.marketplace.id, "atelier-eu");
		assert_eq!(config.marketplace.currency, "EUR");
		assert_eq!(config.storage.backend, "memory");
	}

	#[test]
	fn rejects_empty_backend() {
		let result: Result<Config, _> = r#"
			[marketplace]
			id = "atelier-eu"

			[storage]
			backend = ""
		"#
		.parse();

		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn resolves_env_placeholders() {
		std::env::set_var("LIFECYCLE_TEST_STORAGE_DIR", "/tmp/lifecycle");
		let resolved =
			resolve_env_vars("storage_path = \"${LIFECYCLE_TEST_STORAGE_DIR}\"").unwrap();
		assert_eq!(resolved, "storage_path = \"/tmp/lifecycle\"");

		assert!(resolve_env_vars("x = \"${LIFECYCLE_TEST_UNSET_VAR}\"").is_err());
	}

	#[test]
	fn loads_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(
			file,
			"[marketplace]\nid = \"atelier-eu\"\ncurrency = \"USD\"\n\n[storage]\nbackend = \"file\"\n[storage.config]\nstorage_path = \"/tmp/orders\"\n"
		)
		.unwrap();

		let config = Config::from_file(file.path()).unwrap();
		assert_eq!(config.marketplace.currency, "USD");
		assert_eq!(
			config
				.storage
				.config
				.get("storage_path")
				.and_then(|v| v.as_str()),
			Some("/tmp/orders")
		);
	}
}
