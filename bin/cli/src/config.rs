// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fs,
	path::{Path, PathBuf},
	time::Duration,
};

use cqlcdc_sub_tracing::LogFormat;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Settings of the watcher process, read from a YAML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Mirrors `cdc_enabled` of the database node; nothing is written to the CDC directory otherwise.
	#[serde(default = "default_cdc_enabled")]
	pub cdc_enabled: bool,

	#[serde(default = "default_cdc_log_location")]
	pub cdc_log_location: PathBuf,

	/// Table layouts, YAML or JSON.
	#[serde(default)]
	pub schema: Option<PathBuf>,

	/// Log and skip a segment the reader cannot finish instead of stopping.
	#[serde(default)]
	pub skip_segment_on_error: bool,

	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,

	/// Delete segment files once they were fully handled.
	#[serde(default = "default_delete_processed")]
	pub delete_processed: bool,

	#[serde(default)]
	pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
	#[serde(default = "default_log_level")]
	pub level: String,

	#[serde(default)]
	pub format: LogFormat,
}

fn default_cdc_enabled() -> bool {
	true
}

fn default_cdc_log_location() -> PathBuf {
	PathBuf::from("./cdc_raw")
}

fn default_poll_interval_ms() -> u64 {
	1000
}

fn default_delete_processed() -> bool {
	true
}

fn default_log_level() -> String {
	"info".to_string()
}

impl Default for Config {
	fn default() -> Self {
		Self {
			cdc_enabled: default_cdc_enabled(),
			cdc_log_location: default_cdc_log_location(),
			schema: None,
			skip_segment_on_error: false,
			poll_interval_ms: default_poll_interval_ms(),
			delete_processed: default_delete_processed(),
			log: LogConfig::default(),
		}
	}
}

impl Default for LogConfig {
	fn default() -> Self {
		Self {
			level: default_log_level(),
			format: LogFormat::default(),
		}
	}
}

impl Config {
	pub fn load(path: &Path) -> Result<Self> {
		let content = fs::read_to_string(path).map_err(|source| Error::Read {
			path: path.to_path_buf(),
			source,
		})?;
		Self::parse(&content).map_err(|source| Error::Config {
			path: path.to_path_buf(),
			source,
		})
	}

	pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
		if content.trim().is_empty() {
			return Ok(Self::default());
		}
		serde_yaml::from_str(content)
	}

	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	#[test]
	fn test_defaults() {
		let config = Config::parse("").unwrap();
		assert_eq!(config, Config::default());
		assert!(config.cdc_enabled);
		assert_eq!(config.cdc_log_location, PathBuf::from("./cdc_raw"));
		assert!(!config.skip_segment_on_error);
		assert!(config.delete_processed);
		assert_eq!(config.poll_interval(), Duration::from_secs(1));
		assert_eq!(config.log.level, "info");
	}

	#[test]
	fn test_partial_file() {
		let config = Config::parse(
			"cdc_log_location: /var/lib/cassandra/cdc_raw\nschema: tables.yaml\nlog:\n  format: json\n",
		)
		.unwrap();
		assert_eq!(config.cdc_log_location, PathBuf::from("/var/lib/cassandra/cdc_raw"));
		assert_eq!(config.schema, Some(PathBuf::from("tables.yaml")));
		assert_eq!(config.log.format, LogFormat::Json);
		assert_eq!(config.log.level, "info");
	}

	#[test]
	fn test_unknown_field_rejected() {
		assert!(Config::parse("cdc_enable: false\n").is_err());
	}

	#[test]
	fn test_load_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "cdc_enabled: false").unwrap();
		writeln!(file, "poll_interval_ms: 250").unwrap();

		let config = Config::load(file.path()).unwrap();
		assert!(!config.cdc_enabled);
		assert_eq!(config.poll_interval(), Duration::from_millis(250));
	}

	#[test]
	fn test_load_invalid_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "poll_interval_ms: soon").unwrap();
		assert!(matches!(Config::load(file.path()), Err(Error::Config { .. })));
	}
}
