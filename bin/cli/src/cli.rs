// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::PathBuf;

use clap::Parser;
use cqlcdc_sub_tracing::LogFormat;

use crate::{config::Config, error::Result};

#[derive(Debug, Parser)]
#[command(name = "cqlcdc", version, about = "Emits one JSON change event per line for decoded commit log segments")]
pub struct Cli {
	/// Directory to watch for new segments, or a single segment file to process once.
	/// Defaults to `cdc_log_location` of the configuration.
	pub path: Option<PathBuf>,

	/// YAML configuration file
	#[arg(short, long, env = "CQLCDC_CONFIG")]
	pub config: Option<PathBuf>,

	/// Table layouts (YAML, or JSON with a .json extension)
	#[arg(short, long, env = "CQLCDC_SCHEMA")]
	pub schema: Option<PathBuf>,

	/// Log filter, e.g. `debug` or `cqlcdc_cdc=trace,info`. Overrides RUST_LOG.
	#[arg(long, env = "CQLCDC_LOG_LEVEL")]
	pub log_level: Option<String>,

	/// pretty, compact or json
	#[arg(long)]
	pub log_format: Option<LogFormat>,

	/// Log and skip segments the reader cannot finish
	#[arg(long)]
	pub skip_segment_on_error: bool,

	#[arg(long)]
	pub poll_interval_ms: Option<u64>,
}

impl Cli {
	/// The configuration file, if any, with command line values applied on top.
	pub fn load_config(&self) -> Result<Config> {
		let mut config = match &self.config {
			Some(path) => Config::load(path)?,
			None => Config::default(),
		};
		self.apply(&mut config);
		Ok(config)
	}

	fn apply(&self, config: &mut Config) {
		if let Some(schema) = &self.schema {
			config.schema = Some(schema.clone());
		}
		if let Some(format) = self.log_format {
			config.log.format = format;
		}
		if self.skip_segment_on_error {
			config.skip_segment_on_error = true;
		}
		if let Some(interval) = self.poll_interval_ms {
			config.poll_interval_ms = interval;
		}
	}
}
