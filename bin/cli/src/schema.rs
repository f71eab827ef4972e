// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	fs,
	path::{Path, PathBuf},
};

use cqlcdc_cdc::TableLayout;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Deserialize)]
struct SchemaFile {
	tables: Vec<TableLayout>,
}

/// Table layouts by table id.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
	tables: HashMap<Uuid, TableLayout>,
}

impl SchemaRegistry {
	/// Reads a `tables:` document. Files ending in `.json` are parsed as JSON, anything else as YAML.
	pub fn load(path: &Path) -> Result<Self> {
		let content = fs::read_to_string(path).map_err(|source| Error::Read {
			path: path.to_path_buf(),
			source,
		})?;

		let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
		let file: SchemaFile = if is_json {
			serde_json::from_str(&content).map_err(|err| schema_error(path, err))?
		} else {
			serde_yaml::from_str(&content).map_err(|err| schema_error(path, err))?
		};

		let registry = Self::from_layouts(file.tables).map_err(|reason| Error::Schema {
			path: path.to_path_buf(),
			reason,
		})?;
		debug!(path = %path.display(), tables = registry.len(), "schema loaded");
		Ok(registry)
	}

	pub fn from_layouts(layouts: impl IntoIterator<Item = TableLayout>) -> std::result::Result<Self, String> {
		let mut tables = HashMap::new();
		for layout in layouts {
			if layout.partition_key.is_empty() {
				return Err(format!("table {} declares no partition key", layout.qualified_name()));
			}
			if let Some(previous) = tables.insert(layout.id, layout) {
				return Err(format!("table id {} is declared twice ({})", previous.id, previous.qualified_name()));
			}
		}
		Ok(Self {
			tables,
		})
	}

	pub fn get(&self, id: &Uuid) -> Option<&TableLayout> {
		self.tables.get(id)
	}

	pub fn len(&self) -> usize {
		self.tables.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tables.is_empty()
	}
}

fn schema_error(path: &Path, err: impl ToString) -> Error {
	Error::Schema {
		path: PathBuf::from(path),
		reason: err.to_string(),
	}
}
