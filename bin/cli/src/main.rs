// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! cqlcdc - turns decoded commit log segments into change events
//!
//! Usage:
//!   # watch the configured CDC directory
//!   cqlcdc --config cqlcdc.yaml
//!
//!   # watch a directory
//!   cqlcdc --schema tables.yaml /var/lib/cassandra/cdc_raw
//!
//!   # process one segment and exit
//!   cqlcdc --schema tables.yaml CommitLog-7-1614834367.log

mod cli;
mod config;
mod error;
mod handler;
mod schema;
mod segment;
mod watch;

use std::{
	io::{self, BufWriter, IsTerminal},
	path::PathBuf,
	process::ExitCode,
};

use clap::Parser;
use cqlcdc_sub_tracing::TracingBuilder;
use tracing::{error, info};

use crate::{
	cli::Cli,
	config::Config,
	error::{Error, Result},
	handler::{EventHandler, SegmentProcessor},
	schema::SchemaRegistry,
	segment::JsonSegmentReader,
	watch::{WatchConfig, Watcher},
};

/// Exit code for fatal startup conditions.
const EXIT_FAILURE: u8 = 255;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
	let cli = Cli::parse();

	let config = match cli.load_config() {
		Ok(config) => config,
		Err(err) => {
			eprintln!("cqlcdc: {}", err);
			return ExitCode::from(EXIT_FAILURE);
		}
	};

	let mut tracing = TracingBuilder::new()
		.with_default_filter(config.log.level.clone())
		.with_format(config.log.format)
		.with_ansi(io::stderr().is_terminal());
	if let Some(level) = &cli.log_level {
		tracing = tracing.with_filter(level.clone());
	}
	if let Err(err) = tracing.init() {
		eprintln!("cqlcdc: {}", err);
		return ExitCode::from(EXIT_FAILURE);
	}

	match run(cli.path, config).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			error!(error = %err, "cqlcdc stopped");
			ExitCode::from(EXIT_FAILURE)
		}
	}
}

async fn run(path: Option<PathBuf>, config: Config) -> Result<()> {
	if !config.cdc_enabled {
		return Err(Error::CdcDisabled);
	}

	let path = path.unwrap_or_else(|| config.cdc_log_location.clone());
	if !path.exists() {
		return Err(Error::MissingPath(path));
	}

	let registry = SchemaRegistry::load(config.schema.as_deref().ok_or(Error::NoSchema)?)?;
	let handler = EventHandler::new(registry, BufWriter::new(io::stdout()));
	let mut processor = SegmentProcessor::new(JsonSegmentReader, handler);

	if !path.is_dir() {
		processor.process(&path)?;
		return Ok(());
	}

	info!(dir = %path.display(), "watching for segments");
	let mut watcher = Watcher::new(WatchConfig::new(&path, &config), processor);
	tokio::select! {
		result = watcher.run() => result,
		_ = tokio::signal::ctrl_c() => {
			info!("interrupted, stopping");
			Ok(())
		}
	}
}
