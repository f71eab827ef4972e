// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Builder pattern for configuring the tracing subscriber

use std::{
	fmt::{Display, Formatter},
	io,
	str::FromStr,
};

use serde::Deserialize;
use tracing::debug;
use tracing_subscriber::{
	EnvFilter,
	filter::ParseError,
	fmt,
	layer::SubscriberExt,
	util::{SubscriberInitExt, TryInitError},
};

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
	#[error("invalid log filter: {0}")]
	InvalidFilter(#[from] ParseError),

	#[error("tracing subscriber already installed: {0}")]
	AlreadyInstalled(#[from] TryInitError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log format '{0}', expected pretty, compact or json")]
pub struct UnknownLogFormat(pub String);

/// How log lines are rendered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Pretty,
	#[default]
	Compact,
	Json,
}

impl FromStr for LogFormat {
	type Err = UnknownLogFormat;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"pretty" => Ok(LogFormat::Pretty),
			"compact" => Ok(LogFormat::Compact),
			"json" => Ok(LogFormat::Json),
			_ => Err(UnknownLogFormat(s.to_string())),
		}
	}
}

impl Display for LogFormat {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			LogFormat::Pretty => "pretty",
			LogFormat::Compact => "compact",
			LogFormat::Json => "json",
		})
	}
}

/// Builder for the process wide tracing subscriber
pub struct TracingBuilder {
	filter: Option<String>,
	default_filter: String,
	format: LogFormat,
	ansi: bool,
}

impl TracingBuilder {
	pub fn new() -> Self {
		Self {
			filter: None,
			default_filter: "info".to_string(),
			format: LogFormat::default(),
			ansi: true,
		}
	}

	/// Explicit filter directives (`debug`, `cqlcdc_cdc=trace,info`, ...). Takes precedence over `RUST_LOG`.
	pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
		self.filter = Some(filter.into());
		self
	}

	/// Used when neither an explicit filter nor `RUST_LOG` is set.
	pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
		self.default_filter = filter.into();
		self
	}

	pub fn with_format(mut self, format: LogFormat) -> Self {
		self.format = format;
		self
	}

	/// Colored output; turn off when stderr is not a terminal.
	pub fn with_ansi(mut self, ansi: bool) -> Self {
		self.ansi = ansi;
		self
	}

	pub fn format(&self) -> LogFormat {
		self.format
	}

	fn env_filter(&self) -> Result<EnvFilter, TracingError> {
		if let Some(filter) = &self.filter {
			return Ok(EnvFilter::try_new(filter)?);
		}
		match EnvFilter::try_from_default_env() {
			Ok(filter) => Ok(filter),
			Err(_) => Ok(EnvFilter::try_new(&self.default_filter)?),
		}
	}

	/// Installs the subscriber as the global default. Fails when one is already installed.
	pub fn init(self) -> Result<(), TracingError> {
		let filter = self.env_filter()?;
		let registry = tracing_subscriber::registry().with(filter);

		match self.format {
			LogFormat::Pretty => registry
				.with(fmt::layer().pretty().with_ansi(self.ansi).with_writer(io::stderr))
				.try_init()?,
			LogFormat::Compact => registry
				.with(fmt::layer().compact().with_ansi(self.ansi).with_writer(io::stderr))
				.try_init()?,
			LogFormat::Json => registry
				.with(fmt::layer().json().with_writer(io::stderr))
				.try_init()?,
		}

		debug!(format = %self.format, "tracing initialized");
		Ok(())
	}
}

impl Default for TracingBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_format() {
		assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
		assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
		assert!(matches!("xml".parse::<LogFormat>(), Err(UnknownLogFormat(_))));
	}

	#[test]
	fn test_explicit_filter() {
		let builder = TracingBuilder::new().with_filter("cqlcdc_cdc=trace,warn");
		assert!(builder.env_filter().is_ok());
	}

	#[test]
	fn test_invalid_filter() {
		let builder = TracingBuilder::new().with_filter("cqlcdc_cdc=loud");
		assert!(matches!(builder.env_filter(), Err(TracingError::InvalidFilter(_))));
	}

	#[test]
	fn test_defaults() {
		let builder = TracingBuilder::default();
		assert_eq!(builder.format(), LogFormat::Compact);
		assert!(builder.ansi);
		assert_eq!(builder.default_filter, "info");
		assert!(!builder.with_ansi(false).ansi);
	}
}
