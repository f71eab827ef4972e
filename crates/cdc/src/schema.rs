// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use cqlcdc_type::ColumnType;
use serde::Deserialize;
use uuid::Uuid;

/// A key column of a table together with its declared type.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ColumnDef {
	pub name: String,
	#[serde(rename = "type")]
	pub ty: ColumnType,
}

impl ColumnDef {
	pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
		Self {
			name: name.into(),
			ty,
		}
	}
}

/// What the walker needs to know about the table a partition mutation belongs to.
///
/// `id` survives table renames and is what events are correlated by; it is never derived from `name`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TableLayout {
	pub keyspace: String,
	#[serde(rename = "table")]
	pub name: String,
	pub id: Uuid,
	/// Partition key columns in key-definition order.
	pub partition_key: Vec<ColumnDef>,
	/// Clustering columns in clustering order.
	#[serde(default)]
	pub clustering: Vec<ColumnDef>,
}

impl TableLayout {
	pub fn new(keyspace: impl Into<String>, name: impl Into<String>, id: Uuid) -> Self {
		Self {
			keyspace: keyspace.into(),
			name: name.into(),
			id,
			partition_key: Vec::new(),
			clustering: Vec::new(),
		}
	}

	pub fn with_partition_key(mut self, name: impl Into<String>, ty: ColumnType) -> Self {
		self.partition_key.push(ColumnDef::new(name, ty));
		self
	}

	pub fn with_clustering(mut self, name: impl Into<String>, ty: ColumnType) -> Self {
		self.clustering.push(ColumnDef::new(name, ty));
		self
	}

	/// Fully qualified `keyspace.table` name, for logs.
	pub fn qualified_name(&self) -> String {
		format!("{}.{}", self.keyspace, self.name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_deserialize_layout() {
		let layout: TableLayout = serde_json::from_value(serde_json::json!({
			"keyspace": "ks",
			"table": "clustering_table",
			"id": "5a1c395e-b41f-11e5-9f22-ba0be0483c18",
			"partition_key": [{"name": "key1", "type": "text"}, {"name": "key2", "type": "int"}],
			"clustering": [{"name": "cluster1", "type": "int"}]
		}))
		.unwrap();

		assert_eq!(layout.qualified_name(), "ks.clustering_table");
		assert_eq!(layout.partition_key.len(), 2);
		assert_eq!(layout.partition_key[1], ColumnDef::new("key2", ColumnType::Int));
		assert_eq!(layout.clustering, vec![ColumnDef::new("cluster1", ColumnType::Int)]);
	}

	#[test]
	fn test_clustering_defaults_to_empty() {
		let layout: TableLayout = serde_json::from_value(serde_json::json!({
			"keyspace": "ks",
			"table": "t",
			"id": "5a1c395e-b41f-11e5-9f22-ba0be0483c18",
			"partition_key": [{"name": "key", "type": "text"}]
		}))
		.unwrap();
		assert!(layout.clustering.is_empty());
	}
}
