// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{io, path::PathBuf};

use cqlcdc_cdc::CdcError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid configuration {path}: {source}")]
	Config {
		path: PathBuf,
		#[source]
		source: serde_yaml::Error,
	},

	#[error("cannot load schema {path}: {reason}")]
	Schema {
		path: PathBuf,
		reason: String,
	},

	#[error("no schema configured, pass --schema or set `schema` in the configuration")]
	NoSchema,

	#[error("change data capture is disabled")]
	CdcDisabled,

	#[error("{0} does not exist")]
	MissingPath(PathBuf),

	#[error("unknown table id {0}")]
	UnknownTable(Uuid),

	#[error(transparent)]
	Cdc(#[from] CdcError),

	#[error("cannot read {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error(transparent)]
	Io(#[from] io::Error),
}

impl Error {
	/// Faults confined to one mutation. The rest of the segment is still processed.
	pub fn is_recoverable(&self) -> bool {
		matches!(self, Error::UnknownTable(_) | Error::Cdc(_))
	}
}

pub type Result<T> = std::result::Result<T, Error>;
